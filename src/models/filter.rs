//! Cohort filter specification.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::Gender;

/// Gender restriction for a comparison cohort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenderFilter {
    #[default]
    Any,
    Male,
    Female,
}

impl GenderFilter {
    /// Whether a participant's gender passes this filter.
    pub fn matches(&self, gender: Gender) -> bool {
        match self {
            GenderFilter::Any => true,
            GenderFilter::Male => gender == Gender::Male,
            GenderFilter::Female => gender == Gender::Female,
        }
    }
}

/// Filter specification for building a comparison cohort.
///
/// Set fields are conjunctive and commutative; an empty set means "no
/// restriction", never "match nothing". The default spec is fully
/// unrestricted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Gender restriction
    #[serde(default)]
    pub gender: GenderFilter,

    /// Start groups to keep; empty = all
    #[serde(default)]
    pub start_groups: BTreeSet<String>,

    /// Age categories to keep; empty = all
    #[serde(default)]
    pub age_groups: BTreeSet<String>,

    /// Keep finishers only
    #[serde(default)]
    pub finishers_only: bool,
}

impl FilterSpec {
    /// A spec that keeps everyone.
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Builder method to restrict by gender.
    pub fn with_gender(mut self, gender: GenderFilter) -> Self {
        self.gender = gender;
        self
    }

    /// Builder method to restrict to a set of start groups.
    pub fn with_start_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.start_groups = groups.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to restrict to a set of age categories.
    pub fn with_age_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.age_groups = groups.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to keep finishers only.
    pub fn finishers_only(mut self, finishers_only: bool) -> Self {
        self.finishers_only = finishers_only;
        self
    }

    /// Whether this spec restricts anything at all.
    pub fn is_unrestricted(&self) -> bool {
        self.gender == GenderFilter::Any
            && self.start_groups.is_empty()
            && self.age_groups.is_empty()
            && !self.finishers_only
    }
}
