pub mod admin_user_repository;
pub mod question_repository;
pub mod subject_repository;

pub use admin_user_repository::{AdminUserRecord, AdminUserRepository, SeaOrmAdminUserRepository};
pub use question_repository::{
    NewQuestion, QuestionRecord, QuestionRepository, QuestionUpdate, QuestionWithSubject,
    SeaOrmQuestionRepository,
};
pub use subject_repository::{
    NewSubject, SeaOrmSubjectRepository, SubjectRecord, SubjectRepository, SubjectUpdate,
};
