// Copyright 2023 Remi Bernotavicius

use crate::database::models::UserId;

pub mod bookmarks;
pub mod catalog;
pub mod image;
pub mod recipe;
pub mod shopping_list;

/// Identity of the caller a view is rendered for. The favorited / in-cart
/// flags depend on it, so rendered views must never be shared between
/// viewers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Viewer {
    Anonymous,
    User(UserId),
}

impl Viewer {
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Self::Anonymous => None,
            Self::User(id) => Some(*id),
        }
    }
}

/// Shared numeric bounds gating both cooking time and ingredient amounts.
/// A value is accepted iff `min < value <= max`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Limits {
    pub min: i32,
    pub max: i32,
}

impl Limits {
    pub fn contains(&self, value: i32) -> bool {
        self.min < value && value <= self.max
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self { min: 0, max: 32000 }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::database::models::{
        Ingredient, IngredientId, NewIngredient, NewTag, NewUser, Tag, TagId, User, UserId,
    };
    use crate::database::{self, schema};
    use diesel::RunQueryDsl as _;
    use diesel::SelectableHelper as _;

    /// Enough of a PNG for format sniffing to accept it.
    pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR";

    pub fn png_data_uri() -> String {
        super::image::encode_data_uri("png", PNG_BYTES)
    }

    pub fn connection() -> database::Connection {
        database::establish_connection(":memory:").unwrap()
    }

    pub fn add_user(conn: &mut database::Connection, username: &str) -> UserId {
        diesel::insert_into(schema::users::table)
            .values(NewUser {
                username,
                email: &format!("{username}@example.com"),
                password_hash: "x",
                first_name: "Test",
                last_name: "User",
            })
            .returning(User::as_returning())
            .get_result::<User>(conn)
            .unwrap()
            .id
    }

    pub fn add_ingredient(
        conn: &mut database::Connection,
        name: &str,
        measurement_unit: &str,
    ) -> IngredientId {
        diesel::insert_into(schema::ingredients::table)
            .values(NewIngredient {
                name,
                measurement_unit,
            })
            .returning(Ingredient::as_returning())
            .get_result::<Ingredient>(conn)
            .unwrap()
            .id
    }

    pub fn add_tag(conn: &mut database::Connection, name: &str, slug: &str) -> TagId {
        diesel::insert_into(schema::tags::table)
            .values(NewTag {
                name,
                slug,
                color: "#49B64E",
            })
            .returning(Tag::as_returning())
            .get_result::<Tag>(conn)
            .unwrap()
            .id
    }
}

#[test]
fn limits_bounds() {
    let limits = Limits::default();
    assert!(!limits.contains(0));
    assert!(limits.contains(1));
    assert!(limits.contains(32000));
    assert!(!limits.contains(32001));
    assert!(!limits.contains(-5));
}
