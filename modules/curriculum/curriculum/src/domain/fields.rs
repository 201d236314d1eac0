//! Field names used in validation errors and their storage limits.

pub struct UserFields;

impl UserFields {
    pub const USERNAME: &'static str = "username";
    pub const EMAIL: &'static str = "email";
    pub const FIRST_NAME: &'static str = "first_name";
    pub const LAST_NAME: &'static str = "last_name";
    pub const PASSWORD: &'static str = "password";

    pub const USERNAME_MAX: usize = 150;
    pub const EMAIL_MAX: usize = 254;
    pub const NAME_MAX: usize = 150;
    pub const PASSWORD_MAX: usize = 128;
}

pub struct GroupFields;

impl GroupFields {
    pub const NAME: &'static str = "name";
    pub const CODENAME: &'static str = "codename";

    pub const NAME_MAX: usize = 150;
    pub const CODENAME_MAX: usize = 100;
    pub const PERMISSION_NAME_MAX: usize = 255;
}

pub struct TaxonomyFields;

impl TaxonomyFields {
    pub const SUBJECT_CODE: &'static str = "subject_code";
    pub const GRADE_CODE: &'static str = "grade_code";
    pub const THEME_CODE: &'static str = "theme_code";
    pub const UNIT_CODE: &'static str = "unit_code";
    pub const OUTCOME_CODE: &'static str = "outcome_code";

    pub const CODE_MAX: usize = 10;
}

pub struct QuestionFields;

impl QuestionFields {
    pub const TAXONOMY_ID: &'static str = "taxonomy_id";
    pub const TEXT: &'static str = "text";
}

pub struct CreditFields;

impl CreditFields {
    pub const AMOUNT: &'static str = "amount";
    pub const BALANCE: &'static str = "balance";
    pub const REASON: &'static str = "reason";

    pub const REASON_MAX: usize = 255;
}
