use thiserror::Error;

/// Errors produced when validating domain data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("{kind} has an empty id")]
    EmptyId { kind: &'static str },

    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },

    #[error("mission {mission} references unknown pub {pub_id}")]
    UnknownPub { mission: String, pub_id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_reference_error(e: &TypeError) -> bool {
        match e {
            TypeError::EmptyId { .. } | TypeError::DuplicateId { .. } => false,
            TypeError::UnknownPub { .. } => true,
        }
    }

    #[test]
    fn display_names_the_offender() {
        let e = TypeError::UnknownPub {
            mission: "m1".into(),
            pub_id: "p9".into(),
        };
        assert!(is_reference_error(&e));
        assert_eq!(e.to_string(), "mission m1 references unknown pub p9");
        let e = TypeError::DuplicateId { kind: "pub", id: "p1".into() };
        assert!(!is_reference_error(&e));
        assert_eq!(e.to_string(), "duplicate pub id: p1");
        assert_eq!(TypeError::EmptyId { kind: "badge" }.to_string(), "badge has an empty id");
    }
}
