//! Deterministic synthetic record generator

use crate::config::ReseedConfig;
use crate::domain::ids::PatientId;
use crate::domain::patient::PatientRecord;
use crate::domain::{AppError, Result};
use chrono::{Duration, Local, Months, NaiveDate};
use fake::faker::address::en::{BuildingNumber, CityName, StateAbbr, StreetName, ZipCode};
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MIN_AGE_YEARS: u32 = 18;
const MAX_AGE_YEARS: u32 = 80;

/// Generator settings
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Probability that a record has no phone number
    pub missing_phone_rate: f64,

    /// RNG seed; a fresh one is drawn per generation when absent
    pub seed: Option<u64>,

    /// Birth dates are drawn relative to this date
    pub reference_date: NaiveDate,
}

impl GeneratorConfig {
    /// Settings with the given defect rate, no fixed seed and today's date
    pub fn new(missing_phone_rate: f64) -> Self {
        Self {
            missing_phone_rate,
            seed: None,
            reference_date: Local::now().date_naive(),
        }
    }

    /// Fixes the RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the date birth dates are drawn relative to
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = date;
        self
    }
}

impl From<&ReseedConfig> for GeneratorConfig {
    fn from(config: &ReseedConfig) -> Self {
        Self {
            missing_phone_rate: config.missing_phone_rate,
            seed: config.seed,
            reference_date: Local::now().date_naive(),
        }
    }
}

/// Synthetic patient generator
///
/// Output is a pure function of `(count, start_id, seed, reference_date)`.
/// Every required field is always populated; the phone number is the only
/// field left blank, with probability `missing_phone_rate` drawn
/// independently per record.
///
/// # Examples
///
/// ```
/// use registry_audit::core::generate::{GeneratorConfig, PatientGenerator};
/// use registry_audit::domain::ids::PatientId;
///
/// let generator = PatientGenerator::new(GeneratorConfig::new(0.2).with_seed(7)).unwrap();
/// let records: Vec<_> = generator.generate(3, PatientId::new(100).unwrap()).collect();
///
/// assert_eq!(records.len(), 3);
/// assert_eq!(records[2].patient_id.value(), 102);
/// ```
#[derive(Debug, Clone)]
pub struct PatientGenerator {
    config: GeneratorConfig,
    earliest_birth: NaiveDate,
    birth_window_days: i64,
}

impl PatientGenerator {
    /// Create a generator
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the defect rate is outside `[0, 1]`
    /// or the reference date leaves no valid birth-date window.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        if !(0.0..=1.0).contains(&config.missing_phone_rate) {
            return Err(AppError::Configuration(format!(
                "missing_phone_rate must be within [0, 1], got {}",
                config.missing_phone_rate
            )));
        }

        let years_before = |years: u32| {
            config
                .reference_date
                .checked_sub_months(Months::new(years * 12))
                .ok_or_else(|| {
                    AppError::Configuration(format!(
                        "reference date {} is too early to derive birth dates",
                        config.reference_date
                    ))
                })
        };
        let earliest_birth = years_before(MAX_AGE_YEARS)?;
        let latest_birth = years_before(MIN_AGE_YEARS)?;

        Ok(Self {
            birth_window_days: (latest_birth - earliest_birth).num_days(),
            earliest_birth,
            config,
        })
    }

    /// Settings this generator was built with
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Lazily generates `count` records with identifiers
    /// `start_id..start_id + count`
    pub fn generate(&self, count: usize, start_id: PatientId) -> GeneratedPatients {
        let seed = self.config.seed.unwrap_or_else(rand::random);
        tracing::debug!(
            count,
            start_id = %start_id,
            seed,
            missing_phone_rate = self.config.missing_phone_rate,
            "Generating synthetic patients"
        );

        GeneratedPatients {
            rng: StdRng::seed_from_u64(seed),
            next_id: start_id,
            remaining: count,
            missing_phone_rate: self.config.missing_phone_rate,
            earliest_birth: self.earliest_birth,
            birth_window_days: self.birth_window_days,
        }
    }
}

/// Iterator over generated records
#[derive(Debug)]
pub struct GeneratedPatients {
    rng: StdRng,
    next_id: PatientId,
    remaining: usize,
    missing_phone_rate: f64,
    earliest_birth: NaiveDate,
    birth_window_days: i64,
}

impl GeneratedPatients {
    fn record(&mut self, patient_id: PatientId) -> PatientRecord {
        let rng = &mut self.rng;

        let first_name: String = FirstName().fake_with_rng(rng);
        let last_name: String = LastName().fake_with_rng(rng);
        let date_of_birth =
            self.earliest_birth + Duration::days(rng.gen_range(0..=self.birth_window_days));
        let sex = if rng.gen_bool(0.5) { "m" } else { "f" };
        let building: String = BuildingNumber().fake_with_rng(rng);
        let street_name: String = StreetName().fake_with_rng(rng);
        let city: String = CityName().fake_with_rng(rng);
        let state: String = StateAbbr().fake_with_rng(rng);
        let postal_code: String = ZipCode().fake_with_rng(rng);
        let phone = format!(
            "{:03}-{:03}-{:04}",
            rng.gen_range(0..1000),
            rng.gen_range(0..1000),
            rng.gen_range(0..10000)
        );

        // Sole defect-injection point
        let omit_phone = rng.gen_bool(self.missing_phone_rate);

        PatientRecord::builder(patient_id)
            .first_name(first_name)
            .last_name(last_name)
            .date_of_birth(date_of_birth)
            .sex(sex)
            .street(format!("{building} {street_name}"))
            .locality(city, state, postal_code)
            .phone(if omit_phone { String::new() } else { phone })
            .national_id(format!("999-00-{:04}", patient_id.value()))
            .build()
    }
}

impl Iterator for GeneratedPatients {
    type Item = PatientRecord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let patient_id = self.next_id;
        self.next_id = patient_id.next();
        Some(self.record(patient_id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for GeneratedPatients {}
