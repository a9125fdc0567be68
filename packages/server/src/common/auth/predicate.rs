use super::errors::ErrorKind;
use super::gate::GateContext;
use crate::domains::payment::models::payment::PaymentState;

/// Authorization predicates that can be stacked in a [`Gate`](super::Gate).
///
/// Predicates only read: each one asks the [`GateContext`] for the facts it
/// needs and either passes or names the failure to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Predicate {
    /// Caller presented a valid credential
    Authenticated,
    /// Caller holds an officer grant or is an initial admin
    IsAdmin,
    /// Caller is the member addressed by the route `id`, or an admin
    IsSelfOrAdmin,
    /// Caller has a non-deleted member row
    IsRegistered,
    /// Caller has no non-deleted member row
    IsNotRegistered,
    /// Caller's registration is approved (initial admins always pass)
    IsApproved,
    /// Caller is registered and still awaiting approval
    IsNotApproved,
    /// Route member was last renewed before this fiscal year
    IsDeactivated,
    /// Route member has been renewed this fiscal year
    IsNotDeactivated,
    /// Caller's own member row has been renewed this fiscal year
    IsCurrentFiscalYearMember,
    /// Route member has no dues payment this fiscal year
    UserNotPaid,
    /// Route member's dues payment this fiscal year is not yet confirmed
    UserPaidAndNotConfirmed,
}

impl Predicate {
    pub fn name(&self) -> &'static str {
        match self {
            Predicate::Authenticated => "authenticated",
            Predicate::IsAdmin => "is_admin",
            Predicate::IsSelfOrAdmin => "is_self_or_admin",
            Predicate::IsRegistered => "is_registered",
            Predicate::IsNotRegistered => "is_not_registered",
            Predicate::IsApproved => "is_approved",
            Predicate::IsNotApproved => "is_not_approved",
            Predicate::IsDeactivated => "is_deactivated",
            Predicate::IsNotDeactivated => "is_not_deactivated",
            Predicate::IsCurrentFiscalYearMember => "is_current_fiscal_year_member",
            Predicate::UserNotPaid => "user_not_paid",
            Predicate::UserPaidAndNotConfirmed => "user_paid_and_not_confirmed",
        }
    }

    pub async fn check(&self, ctx: &mut GateContext<'_>) -> Result<(), ErrorKind> {
        match self {
            Predicate::Authenticated => ctx.identity().map(|_| ()),

            Predicate::IsAdmin => {
                ctx.identity()?;
                ensure(ctx.is_admin().await?, ErrorKind::NotAdmin)
            }

            Predicate::IsSelfOrAdmin => {
                let identity = ctx.identity()?;
                let target = ctx.route_member().await?;
                if target.uid == identity.uid {
                    return Ok(());
                }
                ensure(ctx.is_admin().await?, ErrorKind::NotSelfOrAdmin)
            }

            Predicate::IsRegistered => {
                ctx.identity()?;
                ensure(ctx.caller_member().await?.is_some(), ErrorKind::NotRegistered)
            }

            Predicate::IsNotRegistered => {
                ctx.identity()?;
                ensure(ctx.caller_member().await?.is_none(), ErrorKind::AlreadyRegistered)
            }

            Predicate::IsApproved => {
                ctx.identity()?;
                if ctx.is_allow_listed() {
                    return Ok(());
                }
                let approved = ctx
                    .caller_member()
                    .await?
                    .map(|m| m.is_approved)
                    .unwrap_or(false);
                ensure(approved, ErrorKind::NotApproved)
            }

            Predicate::IsNotApproved => {
                ctx.identity()?;
                let pending = ctx
                    .caller_member()
                    .await?
                    .map(|m| !m.is_approved)
                    .unwrap_or(false);
                ensure(pending, ErrorKind::AlreadyApproved)
            }

            Predicate::IsDeactivated => {
                ctx.identity()?;
                let target = ctx.route_member().await?;
                ensure(!ctx.is_current(target.updated_at), ErrorKind::NotDeactivated)
            }

            Predicate::IsNotDeactivated => {
                ctx.identity()?;
                let target = ctx.route_member().await?;
                ensure(ctx.is_current(target.updated_at), ErrorKind::Deactivated)
            }

            Predicate::IsCurrentFiscalYearMember => {
                ctx.identity()?;
                let current = ctx
                    .caller_member()
                    .await?
                    .map(|m| ctx.is_current(m.updated_at))
                    .unwrap_or(false);
                ensure(current, ErrorKind::Deactivated)
            }

            Predicate::UserNotPaid => {
                let state = ctx.route_payment_state().await?;
                ensure(state == PaymentState::Unpaid, ErrorKind::AlreadyPaid)
            }

            Predicate::UserPaidAndNotConfirmed => {
                let state = ctx.route_payment_state().await?;
                ensure(
                    state == PaymentState::PaidUnconfirmed,
                    ErrorKind::PaymentNotAvailable,
                )
            }
        }
    }
}

fn ensure(condition: bool, failure: ErrorKind) -> Result<(), ErrorKind> {
    if condition {
        Ok(())
    } else {
        Err(failure)
    }
}
