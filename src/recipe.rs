use serde::Serialize;

use crate::classify::{ParsedStatement, dispatch};
use crate::datalog::{Caveat, Fact, Rule};
use crate::error::Result;
use crate::loader::Loader;
use crate::parser::Grammar;
use crate::settings::LoaderConfig;
use crate::token::{AuthorityBuilder, BlockBuilder, Verifier};

/// The parsed contents of one recipe file, a template for the policy part of
/// a token. Each sequence keeps the order the statements had in the source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Recipe {
    name: String,
    facts: Vec<Fact>,
    rules: Vec<Rule>,
    caveats: Vec<Caveat>,
}

impl Recipe {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
    /// Parses a whole recipe text with the default loader settings.
    pub fn parse(name: impl Into<String>, text: &str) -> Result<Self> {
        Loader::new(LoaderConfig::default()).recipe(name, text.as_bytes())
    }
    // Recipes only grow while their file is loaded and are read-only
    // afterwards, so everything else goes through getters.
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn facts(&self) -> &[Fact] {
        &self.facts
    }
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
    pub fn caveats(&self) -> &[Caveat] {
        &self.caveats
    }
    /// Total number of facts, rules and caveats.
    pub fn len(&self) -> usize {
        self.facts.len() + self.rules.len() + self.caveats.len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parses one statement and appends the result to the matching sequence.
    // Statements may arrive without going through the scanner, so the
    // surrounding newlines are trimmed here as well.
    pub(crate) fn load<G: Grammar + ?Sized>(&mut self, grammar: &G, statement: &str) -> Result<()> {
        match dispatch(grammar, statement.trim_matches('\n'))? {
            ParsedStatement::Fact(fact) => self.facts.push(fact),
            ParsedStatement::Rule(rule) => self.rules.push(rule),
            ParsedStatement::Caveat(caveat) => self.caveats.push(caveat),
        }
        Ok(())
    }

    /// Appends the other recipe's sequences after this one's. The name of
    /// `self` is kept.
    pub fn merge(mut self, other: &Recipe) -> Recipe {
        self.facts.extend_from_slice(&other.facts);
        self.rules.extend_from_slice(&other.rules);
        self.caveats.extend_from_slice(&other.caveats);
        self
    }

    /// Adds all facts, rules and caveats to the verifier.
    pub fn apply<V: Verifier + ?Sized>(&self, verifier: &mut V) {
        for fact in &self.facts {
            verifier.add_fact(fact);
        }
        for rule in &self.rules {
            verifier.add_rule(rule);
        }
        for caveat in &self.caveats {
            verifier.add_caveat(caveat);
        }
    }

    /// Adds all facts, rules and caveats as authority data. Stops at the
    /// first rejected object.
    pub fn build<B: AuthorityBuilder + ?Sized>(&self, builder: &mut B) -> std::result::Result<(), B::Error> {
        for fact in &self.facts {
            builder.add_authority_fact(fact)?;
        }
        for rule in &self.rules {
            builder.add_authority_rule(rule)?;
        }
        for caveat in &self.caveats {
            builder.add_authority_caveat(caveat)?;
        }
        Ok(())
    }

    /// Adds all facts, rules and caveats to an attenuation block. Stops at the
    /// first rejected object.
    pub fn build_block<B: BlockBuilder + ?Sized>(&self, builder: &mut B) -> std::result::Result<(), B::Error> {
        for fact in &self.facts {
            builder.add_fact(fact)?;
        }
        for rule in &self.rules {
            builder.add_rule(rule)?;
        }
        for caveat in &self.caveats {
            builder.add_caveat(caveat)?;
        }
        Ok(())
    }
}
