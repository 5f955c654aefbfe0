use std::collections::BTreeMap;

use crate::api::ApiClient;
use crate::auth::Route;
use crate::types::{AppError, AvailablePapers, CourseListing, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub code: String,
    pub name: String,
    /// Newest first.
    pub years: Vec<i32>,
}

impl Course {
    pub fn label(&self) -> String {
        course_label(&self.code, &self.name)
    }

    pub fn latest_year(&self) -> Option<i32> {
        self.years.first().copied()
    }
}

pub fn course_label(code: &str, name: &str) -> String {
    format!("{} : {}", code, name)
}

/// Courses offered by the search page, keyed by display label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseCatalog {
    courses: BTreeMap<String, Course>,
}

impl CourseCatalog {
    pub fn from_papers(papers: AvailablePapers) -> Self {
        Self::from_entries(papers)
    }

    /// Entries that share a label are merged and their years deduplicated.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, CourseListing)>,
    {
        let mut courses: BTreeMap<String, Course> = BTreeMap::new();
        for (code, listing) in entries {
            let label = course_label(&code, &listing.name);
            courses
                .entry(label)
                .or_insert_with(|| Course {
                    code,
                    name: listing.name,
                    years: Vec::new(),
                })
                .years
                .extend(listing.years);
        }

        for course in courses.values_mut() {
            course.years.sort_unstable_by(|a, b| b.cmp(a));
            course.years.dedup();
        }

        Self { courses }
    }

    /// Display labels in lexicographic order.
    pub fn labels(&self) -> Vec<&str> {
        self.courses.keys().map(String::as_str).collect()
    }

    pub fn course(&self, label: &str) -> Option<&Course> {
        self.courses.get(label)
    }

    pub fn years(&self, label: &str) -> &[i32] {
        self.courses
            .get(label)
            .map(|c| c.years.as_slice())
            .unwrap_or_default()
    }

    /// Labels containing `query`, ignoring case.
    pub fn filter(&self, query: &str) -> Vec<&str> {
        let query = query.trim().to_lowercase();
        self.courses
            .keys()
            .filter(|label| label.to_lowercase().contains(&query))
            .map(String::as_str)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

pub async fn load_catalog(client: &ApiClient) -> Result<CourseCatalog> {
    let papers = client.available_papers().await?;
    let catalog = CourseCatalog::from_papers(papers);
    tracing::debug!(courses = catalog.len(), "Loaded course catalog");
    Ok(catalog)
}

/// Course and year picked on the search page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    course: Option<Course>,
    year: Option<i32>,
}

impl SearchForm {
    /// Selecting a course also selects its most recent year.
    pub fn select_course(&mut self, catalog: &CourseCatalog, label: &str) -> Result<()> {
        let course = catalog
            .course(label)
            .ok_or_else(|| AppError::Validation(format!("Unknown course '{}'", label)))?;
        self.year = course.latest_year();
        self.course = Some(course.clone());
        Ok(())
    }

    pub fn select_year(&mut self, year: i32) -> Result<()> {
        let course = self
            .course
            .as_ref()
            .ok_or_else(|| AppError::Validation("Select a course first".to_string()))?;
        if !course.years.contains(&year) {
            return Err(AppError::Validation(format!(
                "No {} paper for {}",
                year, course.code
            )));
        }
        self.year = Some(year);
        Ok(())
    }

    pub fn course(&self) -> Option<&Course> {
        self.course.as_ref()
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    /// Route of the selected paper, keyed by the raw course code.
    pub fn paper_route(&self) -> Result<Route> {
        match (&self.course, self.year) {
            (Some(course), Some(year)) => Ok(Route::paper(course.code.clone(), year)),
            _ => Err(AppError::Validation(
                "Select a course and a year".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(name: &str, years: &[i32]) -> CourseListing {
        CourseListing {
            name: name.to_string(),
            years: years.to_vec(),
        }
    }

    fn scenario() -> CourseCatalog {
        CourseCatalog::from_entries(vec![
            ("MA200".to_string(), listing("Calc", &[2020])),
            ("CS101".to_string(), listing("Intro", &[2018])),
            ("CS101".to_string(), listing("Intro", &[2019, 2018])),
        ])
    }

    #[test]
    fn test_labels_are_lexicographic_and_merged() {
        assert_eq!(scenario().labels(), vec!["CS101 : Intro", "MA200 : Calc"]);
    }

    #[test]
    fn test_years_are_descending() {
        assert_eq!(scenario().years("CS101 : Intro"), &[2019, 2018]);
        assert!(scenario().years("nope").is_empty());
    }

    #[test]
    fn test_selecting_course_picks_latest_year() {
        let catalog = scenario();
        let mut form = SearchForm::default();
        form.select_course(&catalog, "CS101 : Intro").unwrap();
        assert_eq!(form.year(), Some(2019));
        assert_eq!(form.paper_route().unwrap(), Route::paper("CS101", 2019));

        form.select_year(2018).unwrap();
        assert_eq!(form.paper_route().unwrap().path(), "/CS101/2018");
        assert!(form.select_year(2000).is_err());
    }

    #[test]
    fn test_route_needs_a_selection() {
        let form = SearchForm::default();
        assert!(form.paper_route().unwrap_err().is_validation());
    }

    #[test]
    fn test_filter_ignores_case() {
        assert_eq!(scenario().filter("calc"), vec!["MA200 : Calc"]);
        assert_eq!(scenario().filter("").len(), 2);
    }
}
