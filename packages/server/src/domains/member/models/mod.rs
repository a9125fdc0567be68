pub mod member;
pub mod profile;
pub mod registration;
pub mod skill;

pub use member::Member;
pub use profile::MemberProfile;
pub use skill::MemberSkill;
