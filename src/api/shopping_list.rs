// Copyright 2023 Remi Bernotavicius

use crate::database;
use crate::database::models::{Ingredient, RecipeIngredient, UserId};
use crate::database::schema;
use crate::Result;
use diesel::ExpressionMethods as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListItem {
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}

impl fmt::Display for ShoppingListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) - {}",
            self.name, self.measurement_unit, self.total_amount
        )
    }
}

/// Sums ingredient amounts across every recipe in the user's shopping cart,
/// grouped by ingredient identity, in one pass over the lines.
pub fn shopping_list(
    conn: &mut database::Connection,
    for_user: UserId,
) -> Result<Vec<ShoppingListItem>> {
    let lines: Vec<(RecipeIngredient, Ingredient)> = {
        use schema::shopping_cart::dsl::*;

        schema::recipe_ingredients::table
            .inner_join(schema::ingredients::table)
            .filter(
                schema::recipe_ingredients::recipe_id
                    .eq_any(shopping_cart.filter(user_id.eq(for_user)).select(recipe_id)),
            )
            .select((RecipeIngredient::as_select(), Ingredient::as_select()))
            .load(conn)?
    };

    let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();
    for (line, ingredient) in lines {
        *totals
            .entry((ingredient.name, ingredient.measurement_unit))
            .or_default() += i64::from(line.amount);
    }

    Ok(totals
        .into_iter()
        .map(|((name, measurement_unit), total_amount)| ShoppingListItem {
            name,
            measurement_unit,
            total_amount,
        })
        .collect())
}

/// Plain-text rendering of the list, one item per line, for export.
pub fn format_shopping_list(items: &[ShoppingListItem]) -> String {
    let mut out = String::from("Shopping list\n\n");
    for item in items {
        out += &format!("{item}\n");
    }
    out
}

#[cfg(test)]
fn add_cart_recipe(
    conn: &mut database::Connection,
    owner: UserId,
    name: &str,
    lines: Vec<crate::api::recipe::IngredientLine>,
    tag: crate::database::models::TagId,
) -> crate::database::models::RecipeId {
    use crate::api::recipe::{create_recipe, RecipeForm};
    use crate::api::{bookmarks, testing, Limits};

    let form = RecipeForm {
        name: name.into(),
        text: "Cook it.".into(),
        cooking_time: 30,
        image: testing::png_data_uri(),
        ingredients: lines,
        tags: vec![tag],
    };
    let id = create_recipe(conn, &Limits::default(), owner, &form).unwrap().id;
    bookmarks::add_to_cart(conn, owner, id).unwrap();
    id
}

#[test]
fn totals_are_grouped_by_ingredient() {
    use crate::api::recipe::IngredientLine;
    use crate::api::testing;
    use maplit::btreemap;

    let mut conn = testing::connection();
    let cook = testing::add_user(&mut conn, "alice");
    let flour = testing::add_ingredient(&mut conn, "flour", "g");
    let milk = testing::add_ingredient(&mut conn, "milk", "ml");
    let tag = testing::add_tag(&mut conn, "dinner", "dinner");

    add_cart_recipe(
        &mut conn,
        cook,
        "Pancakes",
        vec![
            IngredientLine { id: flour, amount: 2 },
            IngredientLine { id: milk, amount: 3 },
        ],
        tag,
    );
    add_cart_recipe(
        &mut conn,
        cook,
        "Bread",
        vec![IngredientLine { id: flour, amount: 3 }],
        tag,
    );

    let items = shopping_list(&mut conn, cook).unwrap();
    let as_map: BTreeMap<(String, String), i64> = items
        .into_iter()
        .map(|i| ((i.name, i.measurement_unit), i.total_amount))
        .collect();
    assert_eq!(
        as_map,
        btreemap! {
            ("flour".into(), "g".into()) => 5,
            ("milk".into(), "ml".into()) => 3,
        }
    );
}

#[test]
fn only_the_callers_cart_counts() {
    use crate::api::recipe::IngredientLine;
    use crate::api::testing;

    let mut conn = testing::connection();
    let cook = testing::add_user(&mut conn, "alice");
    let other = testing::add_user(&mut conn, "bob");
    let flour = testing::add_ingredient(&mut conn, "flour", "g");
    let tag = testing::add_tag(&mut conn, "dinner", "dinner");

    add_cart_recipe(
        &mut conn,
        cook,
        "Bread",
        vec![IngredientLine { id: flour, amount: 3 }],
        tag,
    );

    assert!(shopping_list(&mut conn, other).unwrap().is_empty());
    assert_eq!(shopping_list(&mut conn, cook).unwrap().len(), 1);
}

#[test]
fn formatted_list() {
    let items = vec![
        ShoppingListItem {
            name: "flour".into(),
            measurement_unit: "g".into(),
            total_amount: 5,
        },
        ShoppingListItem {
            name: "milk".into(),
            measurement_unit: "ml".into(),
            total_amount: 3,
        },
    ];
    assert_eq!(
        format_shopping_list(&items),
        "Shopping list\n\nflour (g) - 5\nmilk (ml) - 3\n"
    );
}
