use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error};

use super::allow_list::AdminAllowList;
use super::errors::{DirectoryError, ErrorKind};
use super::identity::Identity;
use super::predicate::Predicate;
use crate::common::fiscal_year::FiscalYear;
use crate::domains::member::models::member::Member;
use crate::domains::payment::models::payment::PaymentState;
use crate::kernel::BaseMemberDirectory;

/// Ordered list of predicates guarding one route.
///
/// ```ignore
/// let gate = Gate::new([Predicate::IsAdmin, Predicate::UserNotPaid]);
/// gate.evaluate(&mut ctx).await?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Gate {
    predicates: Vec<Predicate>,
}

impl Gate {
    pub fn new(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        Self {
            predicates: predicates.into_iter().collect(),
        }
    }

    /// Append `other`'s predicates after this gate's own
    pub fn then(mut self, other: Gate) -> Self {
        self.predicates.extend(other.predicates);
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Run predicates in order, stopping at the first failure.
    ///
    /// Predicates already passed earlier in the same request (recorded in the
    /// memo) are skipped.
    pub async fn evaluate(&self, ctx: &mut GateContext<'_>) -> Result<(), ErrorKind> {
        for predicate in &self.predicates {
            if ctx.memo.has_passed(*predicate) {
                continue;
            }

            if let Err(kind) = predicate.check(ctx).await {
                debug!(
                    predicate = predicate.name(),
                    code = kind.report().code,
                    "Gate rejected request"
                );
                return Err(kind);
            }

            ctx.memo.passed.push(*predicate);
        }

        Ok(())
    }
}

/// Shared collaborators every gate evaluation reads from
#[derive(Clone)]
pub struct GateDeps {
    pub directory: Arc<dyn BaseMemberDirectory>,
    pub allow_list: AdminAllowList,
    pub fiscal_year: FiscalYear,
}

impl GateDeps {
    pub fn new(
        directory: Arc<dyn BaseMemberDirectory>,
        allow_list: AdminAllowList,
        fiscal_year: FiscalYear,
    ) -> Self {
        Self {
            directory,
            allow_list,
            fiscal_year,
        }
    }

    /// Caller's email is on the initial-admin list (no directory read)
    pub fn is_allow_listed(&self, identity: &Identity) -> bool {
        self.allow_list.contains(identity.email.as_deref())
    }

    /// Admin status: allow-list first, then the officer grant.
    ///
    /// The only place admin rights are derived. Gates reach it through
    /// [`GateContext::is_admin`], handlers call it directly when no gate
    /// has already answered.
    pub async fn is_admin(&self, identity: &Identity) -> Result<bool, ErrorKind> {
        if self.is_allow_listed(identity) {
            return Ok(true);
        }
        self.directory
            .has_officer_grant(&identity.uid)
            .await
            .map_err(unavailable)
    }
}

/// Facts already established for the current request.
///
/// Lives in the request extensions so stacked gate layers share it.
#[derive(Debug, Clone, Default)]
pub struct GateMemo {
    passed: Vec<Predicate>,
    route_member: Option<Member>,
    caller_member: Option<Option<Member>>,
    is_admin: Option<bool>,
    route_payment: Option<PaymentState>,
}

impl GateMemo {
    pub fn has_passed(&self, predicate: Predicate) -> bool {
        self.passed.contains(&predicate)
    }

    /// Member addressed by the route `id`, if a predicate resolved it
    pub fn route_member(&self) -> Option<&Member> {
        self.route_member.as_ref()
    }

    pub fn is_admin(&self) -> Option<bool> {
        self.is_admin
    }
}

/// Per-request view the predicates evaluate against
pub struct GateContext<'a> {
    identity: Option<&'a Identity>,
    params: &'a HashMap<String, String>,
    deps: &'a GateDeps,
    now: DateTime<Utc>,
    memo: &'a mut GateMemo,
}

impl<'a> GateContext<'a> {
    pub fn new(
        identity: Option<&'a Identity>,
        params: &'a HashMap<String, String>,
        deps: &'a GateDeps,
        now: DateTime<Utc>,
        memo: &'a mut GateMemo,
    ) -> Self {
        Self {
            identity,
            params,
            deps,
            now,
            memo,
        }
    }

    pub fn identity(&self) -> Result<&'a Identity, ErrorKind> {
        self.identity.ok_or(ErrorKind::AuthFailed)
    }

    pub fn is_current(&self, updated_at: DateTime<Utc>) -> bool {
        self.deps.fiscal_year.is_current(updated_at, self.now)
    }

    pub fn cycle_start(&self) -> DateTime<Utc> {
        self.deps.fiscal_year.start_for(self.now)
    }

    pub fn is_allow_listed(&self) -> bool {
        self.identity
            .map(|identity| self.deps.is_allow_listed(identity))
            .unwrap_or(false)
    }

    /// [`GateDeps::is_admin`] for the caller, memoized for the request
    pub async fn is_admin(&mut self) -> Result<bool, ErrorKind> {
        if let Some(cached) = self.memo.is_admin {
            return Ok(cached);
        }

        let identity = self.identity()?;
        let is_admin = self.deps.is_admin(identity).await?;

        self.memo.is_admin = Some(is_admin);
        Ok(is_admin)
    }

    /// Caller's non-deleted member row
    pub async fn caller_member(&mut self) -> Result<Option<Member>, ErrorKind> {
        if let Some(cached) = &self.memo.caller_member {
            return Ok(cached.clone());
        }

        let identity = self.identity()?;
        let member = self
            .deps
            .directory
            .find_member_by_uid(&identity.uid)
            .await
            .map_err(unavailable)?;

        self.memo.caller_member = Some(member.clone());
        Ok(member)
    }

    /// Member addressed by the numeric route `id`
    pub async fn route_member(&mut self) -> Result<Member, ErrorKind> {
        if let Some(cached) = &self.memo.route_member {
            return Ok(cached.clone());
        }

        let id = parse_route_id(self.params.get("id").map(String::as_str))?;
        let member = self
            .deps
            .directory
            .find_member_by_id(id)
            .await
            .map_err(unavailable)?
            .ok_or(ErrorKind::UserNotFound)?;

        self.memo.route_member = Some(member.clone());
        Ok(member)
    }

    /// Payment state of the route member for the current cycle
    pub async fn route_payment_state(&mut self) -> Result<PaymentState, ErrorKind> {
        if let Some(cached) = self.memo.route_payment {
            return Ok(cached);
        }

        let member = self.route_member().await?;
        let since = self.cycle_start();
        let state = self
            .deps
            .directory
            .payment_state(&member.uid, since)
            .await
            .map_err(unavailable)?;

        self.memo.route_payment = Some(state);
        Ok(state)
    }
}

/// Parse a numeric route id, naming the parameter on failure
pub fn parse_route_id(raw: Option<&str>) -> Result<i64, ErrorKind> {
    raw.and_then(|value| value.parse::<i64>().ok())
        .ok_or(ErrorKind::InvalidRequest { param: "id" })
}

fn unavailable(err: DirectoryError) -> ErrorKind {
    error!(error = %err, "Member directory read failed");
    ErrorKind::from(err)
}
