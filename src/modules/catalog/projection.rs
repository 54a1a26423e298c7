//! What the shopper currently sees: the catalog narrowed by category and
//! search text, plus the category list to choose from.

use serde::{Serialize, Serializer};

use super::models::Listing;
use super::store::Catalog;

/// Display label of the "every category" choice.
pub const ALL_CATEGORIES_LABEL: &str = "الكل";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Parse a category label. Blank text and the all-label select everything;
    /// any other label is kept verbatim so it compares exactly.
    pub fn from_label(label: &str) -> Self {
        if label.trim().is_empty() || label == ALL_CATEGORIES_LABEL {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES_LABEL,
            CategoryFilter::Only(category) => category,
        }
    }

    pub fn matches(&self, listing: &Listing) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => &listing.category == category,
        }
    }
}

impl Serialize for CategoryFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Ephemeral selection state driving the projection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub category: CategoryFilter,
    pub search: String,
}

impl ViewState {
    pub fn new(category: CategoryFilter, search: impl Into<String>) -> Self {
        Self {
            category,
            search: search.into(),
        }
    }
}

/// Case-insensitive substring match on title or author. Empty text matches.
pub fn matches_search(listing: &Listing, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    listing.title.to_lowercase().contains(&needle) || listing.author.to_lowercase().contains(&needle)
}

/// Listings passing both filters, in collection order.
pub fn project<'a>(listings: &'a [Listing], view: &ViewState) -> Vec<&'a Listing> {
    listings
        .iter()
        .filter(|listing| view.category.matches(listing) && matches_search(listing, &view.search))
        .collect()
}

/// `All` followed by each distinct category in first-seen order.
pub fn categories(listings: &[Listing]) -> Vec<CategoryFilter> {
    let mut seen: Vec<&str> = Vec::new();
    for listing in listings {
        if !seen.contains(&listing.category.as_str()) {
            seen.push(&listing.category);
        }
    }

    std::iter::once(CategoryFilter::All)
        .chain(seen.into_iter().map(|c| CategoryFilter::Only(c.to_string())))
        .collect()
}

/// A computed view, detached from the catalog it came from.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Projection {
    pub listings: Vec<Listing>,
    pub categories: Vec<CategoryFilter>,
}

impl Projection {
    pub fn compute(catalog: &Catalog, view: &ViewState) -> Self {
        Self {
            listings: project(catalog.listings(), view).into_iter().cloned().collect(),
            categories: categories(catalog.listings()),
        }
    }
}

/// Recomputes only when the catalog revision or the view state changed.
#[derive(Debug, Default)]
pub struct MemoizedProjection {
    key: Option<(u64, ViewState)>,
    cached: Projection,
    recomputations: u64,
}

impl MemoizedProjection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, catalog: &Catalog, view: &ViewState) -> &Projection {
        let fresh = matches!(&self.key, Some((revision, cached_view))
            if *revision == catalog.revision() && cached_view == view);

        if !fresh {
            self.cached = Projection::compute(catalog, view);
            self.key = Some((catalog.revision(), view.clone()));
            self.recomputations += 1;
        }
        &self.cached
    }

    /// How many times the projection has been rebuilt.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}
