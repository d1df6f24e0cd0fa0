//! Plain-text dump of the registrations collection for operators.

use crate::entities::registration::Registration;
use crate::service::available_seats;
use itertools::Itertools;
use std::fmt;
use webinar_sdk::objects::referral_label;

const RULE_WIDTH: usize = 60;
const SECTION_WIDTH: usize = 40;

/// Report over a newest-first list of registrations.
///
/// Missing referral sources are shown as "Not specified" and counted
/// together under that label.
pub struct RegistrationReport<'a> {
    registrations: &'a [Registration],
}

impl<'a> RegistrationReport<'a> {
    pub fn new(registrations: &'a [Registration]) -> Self {
        Self { registrations }
    }

    /// Referral labels with their counts, largest first. Equal counts are
    /// ordered by label so the output is stable.
    pub fn referral_breakdown(&self) -> Vec<(&'a str, usize)> {
        self.registrations
            .iter()
            .map(|r| referral_label(r.referral_source.as_deref()))
            .counts()
            .into_iter()
            .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
            .collect()
    }
}

impl fmt::Display for RegistrationReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Webinar Registrations")?;
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;

        if self.registrations.is_empty() {
            return writeln!(f, "No registrations found yet.");
        }

        let total = i64::try_from(self.registrations.len()).unwrap_or(i64::MAX);
        writeln!(f, "Total Registrations: {total}")?;
        writeln!(f, "Available Seats: {}", available_seats(total))?;
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;

        for (index, r) in self.registrations.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "Registration #{}", index + 1)?;
            writeln!(f, "{}", "-".repeat(SECTION_WIDTH))?;
            writeln!(f, "Name: {}", r.full_name)?;
            writeln!(f, "Email: {}", r.email)?;
            writeln!(f, "WhatsApp: {}", r.whatsapp)?;
            writeln!(f, "Source: {}", referral_label(r.referral_source.as_deref()))?;
            writeln!(f, "Date: {}", r.created_at)?;
            writeln!(f, "ID: {}", r.id)?;
        }

        writeln!(f)?;
        writeln!(f, "Referral Source Breakdown:")?;
        writeln!(f, "{}", "-".repeat(SECTION_WIDTH))?;
        for (label, count) in self.referral_breakdown() {
            let noun = if count == 1 { "registration" } else { "registrations" };
            writeln!(f, "{label}: {count} {noun}")?;
        }
        Ok(())
    }
}
