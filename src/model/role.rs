//! User roles and the capability wrappers built on top of them.
//!
//! Only instructors may own courses and only students may enroll or track
//! progress. Callers prove the role once, by converting a [`UserEntity`] into
//! an [`Instructor`] or a [`Student`], and the create/update payloads of the
//! dependent entities only accept those wrappers. The schema repeats the rule
//! with role-pinned foreign keys.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::entity::UserEntity;
use crate::model::{CrudRepository, DatabaseError, DatabaseResult, ModelManager, UnknownVariant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Student,
    Instructor,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Instructor => "instructor",
        }
    }
}

impl FromStr for UserRole {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Self::Student),
            "instructor" => Ok(Self::Instructor),
            other => Err(UnknownVariant::new("user role", other)),
        }
    }
}

impl TryFrom<String> for UserRole {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! role_capability {
    ($(#[$meta:meta])* $name:ident, $role:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name(UserEntity);

        impl $name {
            pub const ROLE: UserRole = $role;

            pub fn id(&self) -> Uuid {
                self.0.id()
            }

            pub fn user(&self) -> &UserEntity {
                &self.0
            }

            pub fn into_user(self) -> UserEntity {
                self.0
            }

            /// Loads the user and checks its role. A missing user is reported
            /// as invalid input, since ids here always come from a payload.
            pub async fn fetch(mm: &ModelManager, id: Uuid) -> DatabaseResult<Self> {
                let user = UserEntity::find_by_id(mm, id)
                    .await?
                    .ok_or_else(|| DatabaseError::validation(format!("user {id} does not exist")))?;
                Self::try_from(user)
            }
        }

        impl TryFrom<UserEntity> for $name {
            type Error = DatabaseError;

            fn try_from(user: UserEntity) -> Result<Self, Self::Error> {
                if user.role() == Self::ROLE {
                    Ok(Self(user))
                } else {
                    Err(DatabaseError::RoleMismatch {
                        expected: Self::ROLE,
                        actual: user.role(),
                    })
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

role_capability!(
    /// A user proven to have the instructor role.
    Instructor,
    UserRole::Instructor
);

role_capability!(
    /// A user proven to have the student role.
    Student,
    UserRole::Student
);
