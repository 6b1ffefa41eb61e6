use std::collections::VecDeque;
use tracing::trace;

/// Outcome of a single proposal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Proposal {
    /// The proposer went through its whole list and stays unmatched.
    Exhausted { proposer: usize },
    /// The receiver does not rank the proposer, or prefers its current
    /// partner.
    Rejected { proposer: usize, receiver: usize },
    /// The receiver tentatively holds the proposer, releasing `displaced`.
    Accepted {
        proposer: usize,
        receiver: usize,
        displaced: Option<usize>,
    },
}

/// A one-to-one matching between proposers and receivers.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Matching {
    proposer_of: Vec<Option<usize>>,
    receiver_of: Vec<Option<usize>>,
}

impl Matching {
    pub fn new(proposers: usize, receivers: usize) -> Matching {
        Matching {
            proposer_of: vec![None; receivers],
            receiver_of: vec![None; proposers],
        }
    }

    pub fn proposer_for(&self, receiver: usize) -> Option<usize> {
        self.proposer_of.get(receiver).copied().flatten()
    }

    pub fn receiver_for(&self, proposer: usize) -> Option<usize> {
        self.receiver_of.get(proposer).copied().flatten()
    }

    /// Matched `(receiver, proposer)` pairs, by increasing receiver.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.proposer_of
            .iter()
            .enumerate()
            .filter_map(|(r, p)| p.map(|p| (r, p)))
    }

    pub fn len(&self) -> usize {
        self.pairs().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn pair(&mut self, proposer: usize, receiver: usize) -> Option<usize> {
        let displaced = self.proposer_of[receiver].replace(proposer);
        if let Some(displaced) = displaced {
            self.receiver_of[displaced] = None;
        }
        self.receiver_of[proposer] = Some(receiver);
        displaced
    }
}

/// Proposer-optimal deferred acceptance.
///
/// Preference lists are never modified: each proposer keeps a cursor to the
/// next receiver it will propose to, and unmatched proposers wait in a FIFO
/// queue. Every proposal moves one cursor forward, so the procedure ends after
/// at most one proposal per list entry plus one exhaustion per proposer.
pub struct DeferredAcceptance<'a> {
    proposers: &'a [Vec<usize>],
    /// Rank of each proposer in each receiver's list, indexed by receiver
    /// then by proposer.
    ranks: Vec<Vec<Option<usize>>>,
    cursors: Vec<usize>,
    queue: VecDeque<usize>,
    matching: Matching,
}

impl<'a> DeferredAcceptance<'a> {
    pub fn new(proposers: &'a [Vec<usize>], receivers: &[Vec<usize>]) -> DeferredAcceptance<'a> {
        let ranks = receivers
            .iter()
            .map(|prefs| {
                let mut ranks = vec![None; proposers.len()];
                for (rank, &p) in prefs.iter().enumerate() {
                    if let Some(slot) = ranks.get_mut(p) {
                        if slot.is_none() {
                            *slot = Some(rank);
                        }
                    }
                }
                ranks
            })
            .collect();
        DeferredAcceptance {
            proposers,
            ranks,
            cursors: vec![0; proposers.len()],
            queue: (0..proposers.len()).collect(),
            matching: Matching::new(proposers.len(), receivers.len()),
        }
    }

    fn rank(&self, receiver: usize, proposer: usize) -> Option<usize> {
        self.ranks.get(receiver).and_then(|ranks| ranks[proposer])
    }

    /// Let the next waiting proposer make one proposal. Return `None` once
    /// nobody is left waiting.
    pub fn step(&mut self) -> Option<Proposal> {
        let proposer = self.queue.pop_front()?;
        let Some(&receiver) = self.proposers[proposer].get(self.cursors[proposer]) else {
            trace!(proposer, "preference list exhausted");
            return Some(Proposal::Exhausted { proposer });
        };
        self.cursors[proposer] += 1;
        let accepted = match self.rank(receiver, proposer) {
            None => false,
            Some(rank) => match self.matching.proposer_for(receiver) {
                None => true,
                Some(current) => self.rank(receiver, current).is_none_or(|c| rank < c),
            },
        };
        if !accepted {
            trace!(proposer, receiver, "proposal rejected");
            self.queue.push_back(proposer);
            return Some(Proposal::Rejected { proposer, receiver });
        }
        let displaced = self.matching.pair(proposer, receiver);
        if let Some(displaced) = displaced {
            self.queue.push_back(displaced);
        }
        trace!(proposer, receiver, ?displaced, "proposal accepted");
        Some(Proposal::Accepted {
            proposer,
            receiver,
            displaced,
        })
    }

    pub fn matching(&self) -> &Matching {
        &self.matching
    }

    pub fn run(mut self) -> Matching {
        while self.step().is_some() {}
        self.matching
    }
}

/// Compute the proposer-optimal stable matching. Preference lists hold
/// indices of the other side, most preferred first; a participant missing
/// from a list is unacceptable to its owner.
pub fn stable_matching(proposers: &[Vec<usize>], receivers: &[Vec<usize>]) -> Matching {
    DeferredAcceptance::new(proposers, receivers).run()
}
