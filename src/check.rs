use crate::{
    Dependency,
    config::Config,
    definitions::{ClearlyDefined, Definition, Lookup, LookupError},
    whitelist::{WhitelistEntry, is_whitelisted_by},
};
use serde::Deserialize;
use spdx::Licensee;
use std::fmt;

/// What to do with a dependency when its license data could not be retrieved
#[derive(Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Consider the dependency clear, ie. fail open
    Pass,
    /// Consider the dependency not clear, ie. fail closed
    Fail,
}

/// Checks fail open, an unreachable clearlydefined does not block anyone
pub const DEFAULT_LOOKUP_FAILURE_POLICY: FailurePolicy = FailurePolicy::Pass;

impl Default for FailurePolicy {
    fn default() -> Self {
        DEFAULT_LOOKUP_FAILURE_POLICY
    }
}

/// The license status of a dependency that was not whitelisted
#[derive(Debug)]
pub enum Clearance {
    /// The declared license satisfies the accepted licenses
    Cleared,
    /// The license requirements that were not satisfied
    Disapproved(Vec<String>),
    LookupFailed(LookupError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub success: bool,
    pub details: Option<String>,
}

impl CheckResult {
    #[inline]
    pub fn pass() -> Self {
        Self {
            success: true,
            details: None,
        }
    }

    #[inline]
    pub fn fail(details: impl Into<String>) -> Self {
        Self {
            success: false,
            details: Some(details.into()),
        }
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.details, self.success) {
            (None, true) => f.write_str("pass"),
            (None, false) => f.write_str("fail"),
            (Some(details), true) => write!(f, "pass: {details}"),
            (Some(details), false) => write!(f, "fail: {details}"),
        }
    }
}

pub struct Checker<L> {
    lookup: L,
    accepted: Vec<Licensee>,
    on_lookup_failure: FailurePolicy,
}

impl Checker<ClearlyDefined> {
    /// Creates a checker that retrieves license data from the clearlydefined
    /// instance specified in the configuration
    pub fn from_config(cfg: &Config) -> Result<Self, LookupError> {
        let lookup = ClearlyDefined::with_client(
            reqwest::blocking::Client::new(),
            cfg.clearly_defined_url.clone(),
        )?;

        Ok(Self::new(lookup, cfg.accepted.clone())
            .with_lookup_failure_policy(cfg.on_lookup_failure))
    }
}

impl<L: Lookup> Checker<L> {
    pub fn new(lookup: L, accepted: Vec<Licensee>) -> Self {
        Self {
            lookup,
            accepted,
            on_lookup_failure: DEFAULT_LOOKUP_FAILURE_POLICY,
        }
    }

    pub fn with_lookup_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.on_lookup_failure = policy;
        self
    }

    /// Checks if the dependency can be used, either because it has been
    /// manually reviewed and is in the whitelist, or because its declared
    /// license is accepted
    pub fn check(&self, dependency: &Dependency, whitelist: &[WhitelistEntry]) -> CheckResult {
        // Whitelisted dependencies never hit the network
        if let Some(entry) = is_whitelisted_by(dependency, whitelist) {
            log::debug!(
                "'{dependency}' is whitelisted ({})",
                entry.issue.as_deref().unwrap_or("no issue")
            );
            return CheckResult::pass();
        }

        match self.clearance(dependency) {
            Clearance::Cleared => CheckResult::pass(),
            Clearance::Disapproved(reasons) => CheckResult::fail(reasons.join(", ")),
            Clearance::LookupFailed(err) => match self.on_lookup_failure {
                FailurePolicy::Pass => {
                    log::warn!("assuming '{dependency}' is clear: {:#}", anyhow::Error::new(err));
                    CheckResult::pass()
                }
                FailurePolicy::Fail => CheckResult::fail(format!(
                    "unable to retrieve license data: {:#}",
                    anyhow::Error::new(err)
                )),
            },
        }
    }

    /// Retrieves and evaluates the license data for a dependency, ignoring
    /// any whitelist
    pub fn clearance(&self, dependency: &Dependency) -> Clearance {
        match self.lookup.definition(dependency) {
            Ok(definition) => self.evaluate(dependency, &definition),
            Err(err) => Clearance::LookupFailed(err),
        }
    }

    fn evaluate(&self, dependency: &Dependency, definition: &Definition) -> Clearance {
        let Some(declared) = definition.declared() else {
            log::debug!(
                "'{dependency}' has no declared license, discovered: [{}]",
                definition.discovered().join(", ")
            );
            return Clearance::Disapproved(vec![crate::definitions::NO_ASSERTION.to_owned()]);
        };

        let expr = match crate::parse_license_expression(declared) {
            Ok(expr) => expr,
            Err(err) => {
                log::debug!("unable to parse license expression '{declared}' for '{dependency}': {err}");
                return Clearance::Disapproved(vec![declared.to_owned()]);
            }
        };

        match expr.evaluate_with_failures(|req| {
            self.accepted.iter().any(|licensee| licensee.satisfies(req))
        }) {
            Ok(()) => Clearance::Cleared,
            Err(failed) => {
                // Name the requirements exactly as they were declared, the
                // display of a requirement isn't guaranteed to round trip
                let mut reasons = Vec::<String>::with_capacity(failed.len());
                for er in failed {
                    let reason = declared
                        .get(er.span.start as usize..er.span.end as usize)
                        .map_or_else(|| er.req.to_string(), str::to_owned);

                    if !reasons.contains(&reason) {
                        reasons.push(reason);
                    }
                }
                Clearance::Disapproved(reasons)
            }
        }
    }
}
