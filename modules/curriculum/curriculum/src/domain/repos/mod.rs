mod credits_repo;
mod questions_repo;
mod taxonomy_repo;
mod tests_repo;
mod users_repo;

pub use credits_repo::CreditsRepository;
pub use questions_repo::QuestionsRepository;
pub use taxonomy_repo::TaxonomyRepository;
pub use tests_repo::TestsRepository;
pub use users_repo::UsersRepository;
