use pathfinding::matrix::Matrix;

/// Score given to any pairing involving a dummy slot, below every real score.
pub const DUMMY_SCORE: f64 = f64::NEG_INFINITY;

/// One matchable unit: either backed by a real participant, or a
/// placeholder used to balance both sides of a matching.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Slot<T> {
    Real(T),
    Dummy,
}

impl<T> Slot<T> {
    pub fn real(&self) -> Option<&T> {
        match self {
            Slot::Real(t) => Some(t),
            Slot::Dummy => None,
        }
    }
}

/// Pairwise scoring rule used to rank the participants of one side from the
/// point of view of the other side (more is better).
pub trait ScoringPolicy<F, T> {
    fn score(&self, from: &F, to: &T) -> f64;
}

impl<F, T, C> ScoringPolicy<F, T> for C
where
    C: Fn(&F, &T) -> f64,
{
    fn score(&self, from: &F, to: &T) -> f64 {
        self(from, to)
    }
}

/// Score every `from` slot against every `to` slot, indexed by `from` then
/// by `to`.
pub fn score_matrix<F, T, P>(from: &[Slot<F>], to: &[Slot<T>], policy: &P) -> Matrix<f64>
where
    P: ScoringPolicy<F, T> + ?Sized,
{
    let mut scores = Matrix::new(from.len(), to.len(), DUMMY_SCORE);
    for (i, f) in from.iter().enumerate() {
        let Some(f) = f.real() else { continue };
        for (j, t) in to.iter().enumerate() {
            if let Some(t) = t.real() {
                scores[(i, j)] = policy.score(f, t);
            }
        }
    }
    scores
}

/// Build, for every `from` slot, the indices of all `to` slots ordered by
/// decreasing score. Equal scores keep the order of `to`, so dummy slots
/// always come last, in their original order.
pub fn preference_lists<F, T, P>(from: &[Slot<F>], to: &[Slot<T>], policy: &P) -> Vec<Vec<usize>>
where
    P: ScoringPolicy<F, T> + ?Sized,
{
    if from.is_empty() || to.is_empty() {
        return vec![Vec::new(); from.len()];
    }
    let scores = score_matrix(from, to, policy);
    (0..from.len())
        .map(|i| {
            let mut ranked = (0..to.len()).collect::<Vec<_>>();
            ranked.sort_by(|&a, &b| scores[(i, b)].total_cmp(&scores[(i, a)]));
            ranked
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descending_scores() {
        let from = [Slot::Real(10), Slot::Real(20)];
        let to = [Slot::Real(3), Slot::Real(17), Slot::Real(12)];
        let closeness = |f: &i32, t: &i32| -f64::from((f - t).abs());
        assert_eq!(
            preference_lists(&from, &to, &closeness),
            vec![vec![2, 0, 1], vec![1, 2, 0]]
        );
    }

    #[test]
    fn test_ties_keep_original_order() {
        let from = [Slot::Real(())];
        let to = [Slot::Real(1), Slot::Real(2), Slot::Real(1), Slot::Real(2)];
        let score = |_: &(), t: &i32| f64::from(*t);
        assert_eq!(preference_lists(&from, &to, &score), vec![vec![1, 3, 0, 2]]);
    }

    #[test]
    fn test_dummies_rank_last() {
        let from = [Slot::Real(0.0), Slot::Dummy];
        let to = [Slot::Dummy, Slot::Real(-5.0), Slot::Dummy, Slot::Real(-7.0)];
        let score = |_: &f64, t: &f64| *t;
        assert_eq!(
            preference_lists(&from, &to, &score),
            vec![vec![1, 3, 0, 2], vec![0, 1, 2, 3]]
        );
    }

    #[test]
    fn test_both_directions() {
        struct Distance;
        impl ScoringPolicy<u8, char> for Distance {
            fn score(&self, from: &u8, to: &char) -> f64 {
                -f64::from((i32::from(*from) - *to as i32).abs())
            }
        }
        impl ScoringPolicy<char, u8> for Distance {
            fn score(&self, from: &char, to: &u8) -> f64 {
                <Distance as ScoringPolicy<u8, char>>::score(self, to, from)
            }
        }
        let numbers = [Slot::Real(b'a'), Slot::Real(b'c'), Slot::Dummy];
        let letters = [Slot::Real('c'), Slot::Real('b'), Slot::Real('a')];
        assert_eq!(
            preference_lists(&numbers, &letters, &Distance),
            vec![vec![2, 1, 0], vec![0, 1, 2], vec![0, 1, 2]]
        );
        assert_eq!(
            preference_lists(&letters, &numbers, &Distance),
            vec![vec![1, 0, 2], vec![0, 1, 2], vec![0, 1, 2]]
        );
    }

    #[test]
    fn test_empty_sides() {
        let score = |_: &u8, _: &u8| 1.0;
        assert_eq!(
            preference_lists::<u8, u8, _>(&[Slot::Real(1), Slot::Dummy], &[], &score),
            vec![Vec::<usize>::new(), Vec::new()]
        );
        assert!(preference_lists::<u8, u8, _>(&[], &[Slot::Real(1)], &score).is_empty());
    }
}
