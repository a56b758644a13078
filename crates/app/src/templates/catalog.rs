//! Template catalog: browsing helpers over a list of templates.

use std::collections::BTreeMap;

use fleetops_domain::template::{Template, TemplateCategory};

/// Display information for a [`TemplateCategory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryInfo {
    pub category: TemplateCategory,
    pub label: &'static str,
    pub description: &'static str,
}

impl CategoryInfo {
    /// Machine key of the category.
    #[must_use]
    pub fn key(&self) -> &'static str {
        self.category.key()
    }
}

/// Every category, in display order.
#[must_use]
pub fn template_categories() -> Vec<CategoryInfo> {
    TemplateCategory::ALL
        .into_iter()
        .map(|category| {
            let (label, description) = match category {
                TemplateCategory::Maintenance => {
                    ("Maintenance", "System maintenance and cleanup tasks")
                }
                TemplateCategory::Monitoring => {
                    ("Monitoring", "Health checks and monitoring automations")
                }
                TemplateCategory::Backup => ("Backup", "Data backup and recovery automations"),
                TemplateCategory::Deployment => {
                    ("Deployment", "Application deployment and updates")
                }
                TemplateCategory::Security => {
                    ("Security", "Security scans and compliance checks")
                }
            };
            CategoryInfo {
                category,
                label,
                description,
            }
        })
        .collect()
}

/// Templates of `category`, or all of them when no category is given.
#[must_use]
pub fn filter_by_category(
    templates: &[Template],
    category: Option<TemplateCategory>,
) -> Vec<&Template> {
    templates
        .iter()
        .filter(|template| category.is_none_or(|c| template.category == c))
        .collect()
}

/// Case-insensitive substring search over names and descriptions.
///
/// A blank term matches everything.
#[must_use]
pub fn search<'a>(templates: &'a [Template], term: &str) -> Vec<&'a Template> {
    if term.trim().is_empty() {
        return templates.iter().collect();
    }
    let term = term.to_lowercase();
    templates
        .iter()
        .filter(|template| {
            template.name.to_lowercase().contains(&term)
                || template.description.to_lowercase().contains(&term)
        })
        .collect()
}

/// Templates keyed by category, each group keeping input order.
#[must_use]
pub fn group_by_category(templates: &[Template]) -> BTreeMap<TemplateCategory, Vec<&Template>> {
    let mut groups: BTreeMap<TemplateCategory, Vec<&Template>> = BTreeMap::new();
    for template in templates {
        groups.entry(template.category).or_default().push(template);
    }
    groups
}

/// Name matches first, then alphabetical by name.
///
/// Without a term the order is simply alphabetical.
#[must_use]
pub fn sort_by_relevance<'a>(templates: &'a [Template], term: Option<&str>) -> Vec<&'a Template> {
    let term = term.map(str::to_lowercase).filter(|t| !t.is_empty());
    let mut sorted: Vec<&Template> = templates.iter().collect();
    sorted.sort_by_cached_key(|template| {
        let name = template.name.to_lowercase();
        let misses = term.as_ref().is_some_and(|t| !name.contains(t.as_str()));
        (misses, name, template.name.clone())
    });
    sorted
}
