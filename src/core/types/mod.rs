//! Domain types exchanged with the database layer and the models

pub mod bill;
pub mod canonical;
pub mod issues;
pub mod request;
pub mod summary;
pub mod voting;


pub use bill::BillId;
pub use issues::Issues;
pub use request::{GenerationRequest, ModelTier};
pub use summary::{BillSummary, MemberSummary};
pub use voting::{BillVotingRecord, PartyVotes, Vote};
