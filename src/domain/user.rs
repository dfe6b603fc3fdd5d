use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Label shown on the user card.
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "男性",
            Gender::Female => "女性",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => f.write_str("male"),
            Gender::Female => f.write_str("female"),
        }
    }
}

/// A user record as it is stored, with the names kept flat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub gender: Gender,
    pub first: String,
    pub last: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Document version key, 0 for a freshly inserted record.
    #[serde(rename = "__v", default)]
    pub version: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub gender: Gender,
    pub first: String,
    pub last: String,
    pub email: String,
    pub thumbnail: Option<String>,
}

impl NewUser {
    /// The fixed record inserted by `POST /api/users`.
    ///
    /// The create endpoint does not read the submitted form; it always
    /// stores this record.
    pub fn placeholder() -> Self {
        Self {
            gender: Gender::Male,
            first: "テスト".to_string(),
            last: "太郎".to_string(),
            email: "test@gmail.com".to_string(),
            thumbnail: None,
        }
    }

    pub fn into_user(self, id: String) -> User {
        User {
            id,
            gender: self.gender,
            first: self.first,
            last: self.last,
            email: self.email,
            thumbnail: self.thumbnail,
            version: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserName {
    pub first: String,
    pub last: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Picture {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// Wire shape shared by the list endpoint and the embedded page state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserView {
    pub gender: Gender,
    pub name: UserName,
    pub email: String,
    pub picture: Picture,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        UserView {
            gender: user.gender,
            name: UserName {
                first: user.first,
                last: user.last,
            },
            email: user.email,
            picture: Picture {
                thumbnail: user.thumbnail,
            },
        }
    }
}

/// Values of the "new user" dialog form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserForm {
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub first: Option<String>,
    #[serde(default)]
    pub last: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserForm {
    /// Field name to error message; empty when the form is acceptable.
    pub fn validate(&self) -> BTreeMap<&'static str, &'static str> {
        let mut errors = BTreeMap::new();
        let required = [
            ("first", &self.first),
            ("last", &self.last),
            ("email", &self.email),
        ];
        for (field, value) in required {
            if value.as_deref().is_none_or(|v| v.trim().is_empty()) {
                errors.insert(field, "Required");
            }
        }
        errors
    }
}
