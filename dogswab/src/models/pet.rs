use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Species classification used by the recommendation rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Dog,
    Cat,
    #[serde(other)]
    Other,
}

/// A pet profile as supplied by the owning application.
///
/// The engine treats this as read-only input; profile CRUD lives elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub species: Species,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub medical_conditions: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
}

impl Pet {
    /// Calendar age in whole years as of `today`, if a birth date is known.
    pub fn age_years(&self, today: NaiveDate) -> Option<u32> {
        self.date_of_birth.and_then(|birth| today.years_since(birth))
    }
}

/// Kind of vet visit recorded in a pet's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitType {
    Checkup,
    Vaccination,
    Dental,
    Emergency,
    #[serde(other)]
    Other,
}

/// One entry from a pet's vet visit history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VetVisit {
    pub visit_date: NaiveDate,
    pub visit_type: VisitType,
    #[serde(default)]
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub treatment: Option<String>,
    #[serde(default)]
    pub medications_prescribed: Vec<String>,
    #[serde(default)]
    pub follow_up_needed: bool,
    #[serde(default)]
    pub follow_up_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pet_born(date: &str) -> Pet {
        Pet {
            id: "pet-1".to_string(),
            name: "Rex".to_string(),
            species: Species::Dog,
            breed: None,
            date_of_birth: Some(date.parse().unwrap()),
            weight_kg: None,
            medical_conditions: Vec::new(),
            allergies: Vec::new(),
            medications: Vec::new(),
        }
    }

    #[test]
    fn test_age_counts_whole_years() {
        let pet = pet_born("2018-06-15");
        let before_birthday: NaiveDate = "2026-06-14".parse().unwrap();
        let on_birthday: NaiveDate = "2026-06-15".parse().unwrap();
        assert_eq!(pet.age_years(before_birthday), Some(7));
        assert_eq!(pet.age_years(on_birthday), Some(8));
    }

    #[test]
    fn test_age_unknown_without_birth_date() {
        let mut pet = pet_born("2018-06-15");
        pet.date_of_birth = None;
        assert_eq!(pet.age_years("2026-01-01".parse().unwrap()), None);
    }

    #[test]
    fn test_unknown_species_parses_as_other() {
        let pet: Pet = serde_json::from_value(serde_json::json!({
            "id": "p1",
            "name": "Kiwi",
            "species": "parrot"
        }))
        .unwrap();
        assert_eq!(pet.species, Species::Other);
        assert!(pet.medical_conditions.is_empty());
    }
}
