use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::schema::normalize_name;

const BUILTIN_SUBSTITUTIONS: [(&str, [&str; 3]); 7] = [
    ("chicken breast", ["turkey breast", "tofu", "tempeh"]),
    ("ground beef", ["ground turkey", "lentils", "mushrooms"]),
    ("butter", ["olive oil", "coconut oil", "margarine"]),
    ("milk", ["almond milk", "oat milk", "coconut milk"]),
    ("cheese", ["nutritional yeast", "cashew cheese", "vegan cheese"]),
    ("eggs", ["flax eggs", "chia eggs", "applesauce"]),
    ("flour", ["almond flour", "coconut flour", "oat flour"]),
];

/// Ingredient name -> acceptable substitutes, in preference order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SubstitutionTable {
    entries: BTreeMap<String, Vec<String>>,
}

impl SubstitutionTable {
    pub fn builtin() -> Self {
        Self::from_pairs(
            BUILTIN_SUBSTITUTIONS
                .iter()
                .map(|(original, subs)| (*original, subs.to_vec())),
        )
    }

    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Vec<&'a str>)>,
    {
        let entries = pairs
            .into_iter()
            .map(|(original, subs)| {
                (
                    normalize_name(original),
                    subs.into_iter().map(normalize_name).collect(),
                )
            })
            .collect();
        Self { entries }
    }

    pub fn substitutes_for(&self, name: &str) -> &[String] {
        self.entries
            .get(&normalize_name(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// First listed substitute for `name` that appears (exactly) in `available`.
    pub fn find_available<'a>(&'a self, name: &str, available: &[String]) -> Option<&'a str> {
        self.substitutes_for(name)
            .iter()
            .find(|sub| available.iter().any(|have| have == *sub))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
