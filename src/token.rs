//! Contexts that consume recipes: a verifier evaluating a token, and the
//! builders constructing one. Recipes push their objects into these in
//! sequence order, facts first, then rules, then caveats.

use crate::datalog::{Caveat, Fact, Rule};

/// Verification context. Recipe objects are already parsed, so adding them
/// cannot fail at this layer.
pub trait Verifier {
    fn add_fact(&mut self, fact: &Fact);
    fn add_rule(&mut self, rule: &Rule);
    fn add_caveat(&mut self, caveat: &Caveat);
}

/// Builder for the authority block of a new token.
pub trait AuthorityBuilder {
    type Error;
    fn add_authority_fact(&mut self, fact: &Fact) -> Result<(), Self::Error>;
    fn add_authority_rule(&mut self, rule: &Rule) -> Result<(), Self::Error>;
    fn add_authority_caveat(&mut self, caveat: &Caveat) -> Result<(), Self::Error>;
}

/// Builder for an attenuation block appended to an existing token.
pub trait BlockBuilder {
    type Error;
    fn add_fact(&mut self, fact: &Fact) -> Result<(), Self::Error>;
    fn add_rule(&mut self, rule: &Rule) -> Result<(), Self::Error>;
    fn add_caveat(&mut self, caveat: &Caveat) -> Result<(), Self::Error>;
}
