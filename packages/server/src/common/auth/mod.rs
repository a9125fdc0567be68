/// Authorization gate pipeline for the roster API
///
/// Routes declare an ordered list of predicates:
///
/// ```ignore
/// use crate::common::auth::{Gate, Predicate::*};
///
/// let gate = Gate::new([IsAdmin, UserNotPaid]);
/// gate.evaluate(&mut ctx).await?;
/// ```
///
/// The first failing predicate decides the reported error. Identity comes
/// from the bearer credential; member facts come from the member directory.

mod allow_list;
mod errors;
mod gate;
mod identity;
mod predicate;

pub use allow_list::AdminAllowList;
pub use errors::{DirectoryError, ErrorBody, ErrorKind, ErrorReport};
pub use gate::{parse_route_id, Gate, GateContext, GateDeps, GateMemo};
pub use identity::{Identity, IdentityResolver, JwtIdentityResolver};
pub use predicate::Predicate;
