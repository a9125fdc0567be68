pub mod member;
pub mod registration;
pub mod state;

pub use member::{
    AddressData, MemberData, MemberDetailData, MemberKindData, MemberRosterData, PrivateInfoData,
};
pub use registration::{CreateMemberRequest, MemberInput, MemberKindInput, MemberRequest};
pub use state::MemberState;
