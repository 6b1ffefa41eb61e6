use std::fmt;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SubjectId(pub u64);

#[derive(Clone, Debug)]
pub struct Subject {
    pub id: SubjectId,
    pub short_name: String,
    pub name: String,
}

impl Subject {
    pub fn new(id: SubjectId, short_name: &str, name: &str) -> Subject {
        Subject {
            id,
            short_name: short_name.to_owned(),
            name: name.to_owned(),
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} - {}", self.short_name, self.name)
    }
}
