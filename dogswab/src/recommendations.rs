use chrono::{Duration, NaiveDate, Utc};
use nanoid::nanoid;
use serde_json::json;

use crate::models::{
    Pet, Priority, Recommendation, RecommendationStatus, RecommendationType, Species, VetVisit,
    VisitType,
};

/// Window applied by upcoming-view callers that don't pick their own.
pub const DEFAULT_UPCOMING_WINDOW_DAYS: i64 = 30;

/// Rule-based generator of care recommendations from a pet record and its
/// vet visit history.
///
/// Rules run in a fixed order so output is deterministic for a given input
/// and date. Thresholds are tunable per instance; the defaults mirror common
/// veterinary guidance.
pub struct HealthRecommendationEngine {
    checkup_interval_days: i64,
    vaccination_interval_days: i64,
    dental_interval_days: i64,
    medication_refill_days: i64,
    follow_up_window_days: i64,
    senior_age_dog: u32,
    senior_age_cat: u32,
    senior_age_other: u32,
}

impl Default for HealthRecommendationEngine {
    fn default() -> Self {
        Self {
            checkup_interval_days: 365,
            vaccination_interval_days: 365,
            dental_interval_days: 365,
            medication_refill_days: 60,
            follow_up_window_days: 14,
            senior_age_dog: 7,
            senior_age_cat: 11,
            senior_age_other: 7,
        }
    }
}

impl HealthRecommendationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate recommendations as of today.
    pub fn generate(&self, pet: &Pet, history: &[VetVisit]) -> Vec<Recommendation> {
        self.generate_at(pet, history, Utc::now().date_naive())
    }

    /// Generate recommendations as of a given date. Split out for tests.
    pub fn generate_at(&self, pet: &Pet, history: &[VetVisit], today: NaiveDate) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();

        self.checkup_rule(pet, history, today, &mut recommendations);
        self.vaccination_rule(pet, history, today, &mut recommendations);
        self.senior_care_rule(pet, today, &mut recommendations);
        self.dental_rule(pet, history, today, &mut recommendations);
        self.hydration_rule(pet, &mut recommendations);
        self.medication_refill_rule(pet, history, today, &mut recommendations);
        self.follow_up_rule(pet, history, today, &mut recommendations);
        self.condition_monitoring_rule(pet, &mut recommendations);
        self.exercise_rule(pet, &mut recommendations);

        recommendations
    }

    fn checkup_rule(
        &self,
        pet: &Pet,
        history: &[VetVisit],
        today: NaiveDate,
        out: &mut Vec<Recommendation>,
    ) {
        let last_checkup = last_visit_of(history, VisitType::Checkup);
        let due = match last_checkup {
            Some(visit) => days_since(visit.visit_date, today) > self.checkup_interval_days,
            None => true,
        };
        if !due {
            return;
        }

        let description = match last_checkup {
            Some(_) => format!(
                "It's been over a year since {}'s last checkup. Annual wellness exams help catch health issues early.",
                pet.name
            ),
            None => format!(
                "Schedule {}'s first wellness exam to establish a health baseline.",
                pet.name
            ),
        };
        out.push(self.recommendation(
            pet,
            RecommendationType::CheckupReminder,
            format!("Annual Checkup Due for {}", pet.name),
            description,
            Priority::High,
            Some(today + Duration::days(14)),
            Some(json!({ "last_checkup": last_checkup.map(|v| v.visit_date) })),
        ));
    }

    fn vaccination_rule(
        &self,
        pet: &Pet,
        history: &[VetVisit],
        today: NaiveDate,
        out: &mut Vec<Recommendation>,
    ) {
        let last_vaccination = last_visit_of(history, VisitType::Vaccination);
        let due = match last_vaccination {
            Some(visit) => days_since(visit.visit_date, today) > self.vaccination_interval_days,
            None => true,
        };
        if !due {
            return;
        }

        let vaccine_info = match pet.species {
            Species::Dog => "Core vaccines include rabies, DHPP, and bordetella.",
            Species::Cat => "Core vaccines include FVRCP and rabies.",
            Species::Other => "Talk to your vet about recommended vaccines.",
        };
        out.push(self.recommendation(
            pet,
            RecommendationType::VaccinationDue,
            format!("{}'s Vaccinations May Be Due", pet.name),
            format!(
                "Annual vaccinations help protect {} from serious diseases. {vaccine_info}",
                pet.name
            ),
            Priority::High,
            Some(today + Duration::days(30)),
            Some(json!({ "last_vaccination": last_vaccination.map(|v| v.visit_date) })),
        ));
    }

    fn senior_care_rule(&self, pet: &Pet, today: NaiveDate, out: &mut Vec<Recommendation>) {
        let Some(age) = pet.age_years(today) else {
            return;
        };
        let senior_age = match pet.species {
            Species::Dog => self.senior_age_dog,
            Species::Cat => self.senior_age_cat,
            Species::Other => self.senior_age_other,
        };
        if age < senior_age {
            return;
        }

        out.push(self.recommendation(
            pet,
            RecommendationType::PreventiveCare,
            format!("Senior Pet Care for {}", pet.name),
            format!(
                "{} is {age} years old. Senior pets benefit from twice-yearly checkups, bloodwork to monitor organs, and age-appropriate diet adjustments.",
                pet.name
            ),
            Priority::Medium,
            None,
            Some(json!({ "age": age, "species": pet.species })),
        ));
    }

    fn dental_rule(
        &self,
        pet: &Pet,
        history: &[VetVisit],
        today: NaiveDate,
        out: &mut Vec<Recommendation>,
    ) {
        if pet.species != Species::Dog {
            return;
        }
        let recent_dental = history.iter().any(|v| {
            v.visit_type == VisitType::Dental
                && days_since(v.visit_date, today) < self.dental_interval_days
        });
        if recent_dental {
            return;
        }

        out.push(self.recommendation(
            pet,
            RecommendationType::HealthTip,
            format!("Dental Care for {}", pet.name),
            "Dental disease affects 80% of dogs by age 3. Regular teeth brushing and professional cleanings prevent infections and maintain overall health.".to_string(),
            Priority::Medium,
            None,
            None,
        ));
    }

    fn hydration_rule(&self, pet: &Pet, out: &mut Vec<Recommendation>) {
        if pet.species != Species::Cat {
            return;
        }
        out.push(self.recommendation(
            pet,
            RecommendationType::HealthTip,
            format!("Hydration Tips for {}", pet.name),
            format!(
                "Cats often don't drink enough water. Consider a water fountain and mix wet food into {}'s diet to prevent kidney and urinary issues.",
                pet.name
            ),
            Priority::Medium,
            None,
            None,
        ));
    }

    fn medication_refill_rule(
        &self,
        pet: &Pet,
        history: &[VetVisit],
        today: NaiveDate,
        out: &mut Vec<Recommendation>,
    ) {
        let latest_prescription = history
            .iter()
            .filter(|v| !v.medications_prescribed.is_empty())
            .max_by_key(|v| v.visit_date);
        let Some(visit) = latest_prescription else {
            return;
        };
        let elapsed = days_since(visit.visit_date, today);
        if elapsed <= self.medication_refill_days {
            return;
        }

        out.push(self.recommendation(
            pet,
            RecommendationType::MedicationRefill,
            format!("Check {}'s Medication Supply", pet.name),
            format!(
                "Medications were prescribed {elapsed} days ago. Verify you have adequate supply and refill if needed."
            ),
            Priority::Medium,
            None,
            Some(json!({ "medications": visit.medications_prescribed })),
        ));
    }

    fn follow_up_rule(
        &self,
        pet: &Pet,
        history: &[VetVisit],
        today: NaiveDate,
        out: &mut Vec<Recommendation>,
    ) {
        let window_end = today + Duration::days(self.follow_up_window_days);
        let pending: Vec<&VetVisit> = history
            .iter()
            .filter(|v| {
                v.follow_up_needed
                    && v.follow_up_date
                        .map(|date| date <= window_end)
                        .unwrap_or(false)
            })
            .collect();
        let Some(first) = pending.first() else {
            return;
        };

        out.push(self.recommendation(
            pet,
            RecommendationType::CheckupReminder,
            format!("Follow-up Appointment Due for {}", pet.name),
            format!(
                "{} has a follow-up appointment scheduled. Don't forget to book or attend this important visit.",
                pet.name
            ),
            Priority::High,
            first.follow_up_date,
            Some(json!({
                "follow_up_dates": pending.iter().map(|v| v.follow_up_date).collect::<Vec<_>>()
            })),
        ));
    }

    fn condition_monitoring_rule(&self, pet: &Pet, out: &mut Vec<Recommendation>) {
        if pet.medical_conditions.is_empty() {
            return;
        }
        out.push(self.recommendation(
            pet,
            RecommendationType::PreventiveCare,
            format!("Monitor {}'s Condition", pet.name),
            format!(
                "{} has known medical conditions: {}. Regular monitoring and vet checkups are important for managing these conditions.",
                pet.name,
                pet.medical_conditions.join(", ")
            ),
            Priority::High,
            None,
            Some(json!({ "conditions": pet.medical_conditions })),
        ));
    }

    fn exercise_rule(&self, pet: &Pet, out: &mut Vec<Recommendation>) {
        if pet.species != Species::Dog {
            return;
        }
        out.push(self.recommendation(
            pet,
            RecommendationType::ExerciseSuggestion,
            format!("Daily Exercise for {}", pet.name),
            format!(
                "Regular exercise helps {} maintain a healthy weight and mental wellness. Aim for 30-60 minutes daily, adjusted for age and breed.",
                pet.name
            ),
            Priority::Low,
            None,
            None,
        ));
    }

    /// Order recommendations for display: active entries before resolved
    /// ones, then by priority (high first). Stable, so rule order is kept
    /// within each group.
    pub fn prioritize(&self, mut recommendations: Vec<Recommendation>) -> Vec<Recommendation> {
        recommendations
            .sort_by_key(|r| (r.status != RecommendationStatus::Active, r.priority));
        recommendations
    }

    /// Active recommendations due within the next `days` days, soonest first.
    /// Entries without a due date never count as upcoming.
    pub fn upcoming(&self, recommendations: &[Recommendation], days: i64) -> Vec<Recommendation> {
        self.upcoming_at(recommendations, days, Utc::now().date_naive())
    }

    pub fn upcoming_at(
        &self,
        recommendations: &[Recommendation],
        days: i64,
        today: NaiveDate,
    ) -> Vec<Recommendation> {
        let window_end = today + Duration::days(days);
        let mut due: Vec<Recommendation> = recommendations
            .iter()
            .filter(|r| {
                r.status == RecommendationStatus::Active
                    && r.due_date
                        .map(|date| date >= today && date <= window_end)
                        .unwrap_or(false)
            })
            .cloned()
            .collect();
        due.sort_by_key(|r| r.due_date);
        due
    }

    #[allow(clippy::too_many_arguments)]
    fn recommendation(
        &self,
        pet: &Pet,
        recommendation_type: RecommendationType,
        title: String,
        description: String,
        priority: Priority,
        due_date: Option<NaiveDate>,
        source_data: Option<serde_json::Value>,
    ) -> Recommendation {
        Recommendation {
            id: nanoid!(),
            pet_id: pet.id.clone(),
            recommendation_type,
            title,
            description,
            priority,
            due_date,
            status: RecommendationStatus::Active,
            generated_at: Utc::now(),
            source_data,
        }
    }
}

fn last_visit_of(history: &[VetVisit], visit_type: VisitType) -> Option<&VetVisit> {
    history
        .iter()
        .filter(|v| v.visit_type == visit_type)
        .max_by_key(|v| v.visit_date)
}

fn days_since(date: NaiveDate, today: NaiveDate) -> i64 {
    (today - date).num_days()
}
