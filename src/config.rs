//! Inspector configuration

/// Configuration for a [`TypeInspector`](crate::TypeInspector)
#[derive(Debug, Clone, Default)]
pub struct InspectConfig {
    /// How to choose between several constructors that all accept the arguments
    pub match_policy: MatchPolicy,
}

/// Constructor selection when more than one declared constructor matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum MatchPolicy {
    /// First matching constructor in declaration order.
    #[default]
    FirstDeclared,
    /// The matching constructor whose parameter types are each at least as specific as every other match's
    /// (an exact type beats `Object`); declaration order breaks remaining ties.
    MostSpecific,
}

impl InspectConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the constructor match policy
    pub fn with_match_policy(mut self, policy: MatchPolicy) -> Self {
        self.match_policy = policy;
        self
    }
}
