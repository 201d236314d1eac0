//! Conversions between `SeaORM` models and SDK contract types.

use curriculum_sdk::{
    CreditTransaction, Group, Permission, Question, Role, Taxonomy, User, UserCredit,
};

use super::entity::{
    credit_transaction, group, permission, question, taxonomy, user, user_credit,
};

impl From<user::Role> for Role {
    fn from(r: user::Role) -> Self {
        match r {
            user::Role::Admin => Role::Admin,
            user::Role::Dealer => Role::Dealer,
            user::Role::Institution => Role::Institution,
            user::Role::Teacher => Role::Teacher,
            user::Role::Student => Role::Student,
        }
    }
}

impl From<Role> for user::Role {
    fn from(r: Role) -> Self {
        match r {
            Role::Admin => user::Role::Admin,
            Role::Dealer => user::Role::Dealer,
            Role::Institution => user::Role::Institution,
            Role::Teacher => user::Role::Teacher,
            Role::Student => user::Role::Student,
        }
    }
}

/// The password hash stays behind in the entity.
impl From<user::Model> for User {
    fn from(e: user::Model) -> Self {
        Self {
            id: e.id,
            username: e.username,
            email: e.email,
            first_name: e.first_name,
            last_name: e.last_name,
            role: e.role.into(),
            is_active: e.is_active,
            is_staff: e.is_staff,
            is_superuser: e.is_superuser,
            date_joined: e.date_joined,
            last_login: e.last_login,
        }
    }
}

impl From<group::Model> for Group {
    fn from(e: group::Model) -> Self {
        Self {
            id: e.id,
            name: e.name,
        }
    }
}

impl From<permission::Model> for Permission {
    fn from(e: permission::Model) -> Self {
        Self {
            id: e.id,
            codename: e.codename,
            name: e.name,
        }
    }
}

impl From<taxonomy::Model> for Taxonomy {
    fn from(e: taxonomy::Model) -> Self {
        Self {
            id: e.id,
            subject_code: e.subject_code,
            grade_code: e.grade_code,
            theme_code: e.theme_code,
            unit_code: e.unit_code,
            outcome_code: e.outcome_code,
        }
    }
}

impl From<question::Model> for Question {
    fn from(e: question::Model) -> Self {
        Self {
            id: e.id,
            taxonomy_id: e.taxonomy_id,
            text: e.text,
            difficulty_score: e.difficulty_score,
        }
    }
}

impl From<credit_transaction::Model> for CreditTransaction {
    fn from(e: credit_transaction::Model) -> Self {
        Self {
            id: e.id,
            user_id: e.user_id,
            amount: e.amount,
            balance_after: e.balance_after,
            reason: e.reason,
            created_at: e.created_at,
        }
    }
}

#[must_use]
pub fn credit_with_owner(credit: user_credit::Model, username: String) -> UserCredit {
    UserCredit {
        id: credit.id,
        user_id: credit.user_id,
        username,
        balance: credit.balance,
    }
}
