mod action_repo;
mod actor_repo;
mod agreement_repo;
mod attachment_repo;
mod category_repo;
mod commitment_repo;
mod document_repo;
mod overview_repo;
mod update_repo;
mod user_repo;

pub use action_repo::ActionRepo;
pub use actor_repo::ActorRepo;
pub use agreement_repo::AgreementRepo;
pub use attachment_repo::AttachmentRepo;
pub use category_repo::CategoryRepo;
pub use commitment_repo::CommitmentRepo;
pub use document_repo::DocumentRepo;
pub use overview_repo::OverviewRepo;
pub use update_repo::UpdateRepo;
pub use user_repo::UserRepo;
