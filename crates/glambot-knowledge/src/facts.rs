//! Curated salon facts.
//!
//! The authoritative service catalog, timings, staff, packages, discounts,
//! and policies, rendered into bilingual text chunks. [`StaticResolver`]
//! serves these directly; the same rendering feeds vector-store ingestion so
//! both retrieval modes answer from one source of truth.
//!
//! [`StaticResolver`]: crate::resolver::StaticResolver

use std::collections::HashMap;

use glambot_core::config::SalonConfig;
use serde_json::Value;

use crate::vector::KnowledgeDoc;

pub struct Service {
    pub name: &'static str,
    pub urdu_name: &'static str,
    pub price_pkr: u32,
    pub duration: &'static str,
    pub description: &'static str,
    pub category: &'static str,
}

pub struct StaffMember {
    pub name: &'static str,
    pub role: &'static str,
    pub specialty: &'static str,
    pub experience: &'static str,
}

pub struct Package {
    pub name: &'static str,
    pub urdu_name: &'static str,
    pub price_pkr: u32,
    pub services: &'static [&'static str],
    pub validity: &'static str,
}

pub struct Discount {
    pub kind: &'static str,
    pub amount: &'static str,
    pub description: &'static str,
    pub terms: &'static str,
}

pub const SERVICES: &[Service] = &[
    Service { name: "Haircut (Men)", urdu_name: "Mardana Baal Kaatna", price_pkr: 500, duration: "30 minutes", description: "Professional men's haircut with styling", category: "Hair" },
    Service { name: "Haircut (Women)", urdu_name: "Khawateen Ka Baal Kaatna", price_pkr: 1000, duration: "45 minutes", description: "Women's haircut with wash and blow dry", category: "Hair" },
    Service { name: "Hair Coloring", urdu_name: "Baalon Ka Rang", price_pkr: 3000, duration: "2 hours", description: "Full hair coloring with premium products", category: "Hair" },
    Service { name: "Hair Highlights", urdu_name: "Hair Highlights", price_pkr: 4500, duration: "2.5 hours", description: "Professional hair highlighting with foils", category: "Hair" },
    Service { name: "Hair Spa Treatment", urdu_name: "Hair Spa", price_pkr: 2500, duration: "1.5 hours", description: "Deep conditioning and hair repair treatment", category: "Hair" },
    Service { name: "Hair Straightening", urdu_name: "Baalon Ko Seedha Karna", price_pkr: 6000, duration: "3 hours", description: "Keratin hair straightening treatment", category: "Hair" },
    Service { name: "Hair Rebonding", urdu_name: "Hair Rebonding", price_pkr: 8000, duration: "4 hours", description: "Complete hair rebonding for silky straight hair", category: "Hair" },
    Service { name: "Hair Perming", urdu_name: "Baalon Ko Curly Karna", price_pkr: 5000, duration: "3 hours", description: "Professional hair perming for curls", category: "Hair" },
    Service { name: "Hair Wash & Blow Dry", urdu_name: "Baal Dhona aur Dry Karna", price_pkr: 600, duration: "30 minutes", description: "Hair wash with professional blow dry styling", category: "Hair" },
    Service { name: "Hair Treatment (Anti-Dandruff)", urdu_name: "Dandruff Treatment", price_pkr: 2000, duration: "1 hour", description: "Specialized anti-dandruff hair treatment", category: "Hair" },
    Service { name: "Hair Treatment (Hair Fall)", urdu_name: "Baal Girne Ka Treatment", price_pkr: 2500, duration: "1 hour", description: "Hair fall control treatment", category: "Hair" },
    Service { name: "Beard Trim & Styling", urdu_name: "Darhi Ka Styling", price_pkr: 300, duration: "20 minutes", description: "Beard trimming and shaping", category: "Hair" },
    Service { name: "Beard Coloring", urdu_name: "Darhi Ka Rang", price_pkr: 800, duration: "30 minutes", description: "Beard coloring service", category: "Hair" },
    Service { name: "Head Massage", urdu_name: "Sar Ki Malish", price_pkr: 500, duration: "20 minutes", description: "Relaxing head and scalp massage", category: "Hair" },
    Service { name: "Basic Facial", urdu_name: "Basic Facial", price_pkr: 1500, duration: "1 hour", description: "Deep cleansing facial with massage", category: "Skin" },
    Service { name: "Gold Facial", urdu_name: "Gold Facial", price_pkr: 3500, duration: "1.5 hours", description: "Luxury gold facial for glowing skin", category: "Skin" },
    Service { name: "Diamond Facial", urdu_name: "Diamond Facial", price_pkr: 5000, duration: "1.5 hours", description: "Premium diamond facial treatment", category: "Skin" },
    Service { name: "Whitening Facial", urdu_name: "Gora Karne Wala Facial", price_pkr: 2500, duration: "1 hour", description: "Skin whitening and brightening facial", category: "Skin" },
    Service { name: "Anti-Aging Facial", urdu_name: "Jhuriyon Ka Facial", price_pkr: 4000, duration: "1.5 hours", description: "Anti-aging facial with collagen treatment", category: "Skin" },
    Service { name: "Acne Treatment", urdu_name: "Pimples Ka Treatment", price_pkr: 3000, duration: "1 hour", description: "Specialized acne treatment facial", category: "Skin" },
    Service { name: "Face Cleanup", urdu_name: "Chehre Ki Safai", price_pkr: 1200, duration: "45 minutes", description: "Basic face cleanup and exfoliation", category: "Skin" },
    Service { name: "Chemical Peel", urdu_name: "Chemical Peel", price_pkr: 4500, duration: "1 hour", description: "Professional chemical peel treatment", category: "Skin" },
    Service { name: "Hydra Facial", urdu_name: "Hydra Facial", price_pkr: 6000, duration: "1.5 hours", description: "Advanced hydra facial with deep hydration", category: "Skin" },
    Service { name: "Manicure", urdu_name: "Manicure", price_pkr: 800, duration: "45 minutes", description: "Hand care with nail polish", category: "Nails" },
    Service { name: "Pedicure", urdu_name: "Pedicure", price_pkr: 1000, duration: "1 hour", description: "Foot care with nail polish", category: "Nails" },
    Service { name: "Gel Manicure", urdu_name: "Gel Manicure", price_pkr: 1500, duration: "1 hour", description: "Long-lasting gel nail polish", category: "Nails" },
    Service { name: "Gel Pedicure", urdu_name: "Gel Pedicure", price_pkr: 1800, duration: "1.5 hours", description: "Long-lasting gel pedicure", category: "Nails" },
    Service { name: "Nail Art", urdu_name: "Nail Art", price_pkr: 500, duration: "30 minutes", description: "Creative nail art designs", category: "Nails" },
    Service { name: "Nail Extension", urdu_name: "Nail Extension", price_pkr: 3000, duration: "2 hours", description: "Acrylic or gel nail extensions", category: "Nails" },
    Service { name: "French Manicure", urdu_name: "French Manicure", price_pkr: 1200, duration: "1 hour", description: "Classic French manicure style", category: "Nails" },
    Service { name: "Bridal Makeup", urdu_name: "Dulhan Ka Makeup", price_pkr: 15000, duration: "3 hours", description: "Complete bridal makeup with hair styling", category: "Makeup" },
    Service { name: "Party Makeup", urdu_name: "Party Makeup", price_pkr: 5000, duration: "1.5 hours", description: "Glamorous party makeup", category: "Makeup" },
    Service { name: "Engagement Makeup", urdu_name: "Mangni Ka Makeup", price_pkr: 8000, duration: "2 hours", description: "Elegant engagement makeup", category: "Makeup" },
    Service { name: "Mehndi Makeup", urdu_name: "Mehndi Ka Makeup", price_pkr: 6000, duration: "2 hours", description: "Traditional mehndi function makeup", category: "Makeup" },
    Service { name: "Natural Makeup", urdu_name: "Natural Makeup", price_pkr: 3000, duration: "1 hour", description: "Light and natural everyday makeup", category: "Makeup" },
    Service { name: "HD Makeup", urdu_name: "HD Makeup", price_pkr: 7000, duration: "2 hours", description: "High definition makeup for photography", category: "Makeup" },
    Service { name: "Threading (Face)", urdu_name: "Chehre Ka Threading", price_pkr: 200, duration: "15 minutes", description: "Eyebrow and face threading", category: "Hair Removal" },
    Service { name: "Threading (Full Face)", urdu_name: "Pura Chehra Threading", price_pkr: 500, duration: "30 minutes", description: "Complete face threading", category: "Hair Removal" },
    Service { name: "Waxing (Full Body)", urdu_name: "Pura Jism Waxing", price_pkr: 3500, duration: "2 hours", description: "Full body waxing service", category: "Hair Removal" },
    Service { name: "Waxing (Half Body)", urdu_name: "Aadha Jism Waxing", price_pkr: 2000, duration: "1 hour", description: "Half body waxing (upper or lower)", category: "Hair Removal" },
    Service { name: "Waxing (Legs)", urdu_name: "Paon Ki Waxing", price_pkr: 1200, duration: "45 minutes", description: "Full legs waxing", category: "Hair Removal" },
    Service { name: "Waxing (Arms)", urdu_name: "Hathon Ki Waxing", price_pkr: 800, duration: "30 minutes", description: "Full arms waxing", category: "Hair Removal" },
    Service { name: "Waxing (Underarms)", urdu_name: "Baghal Ki Waxing", price_pkr: 500, duration: "15 minutes", description: "Underarm waxing", category: "Hair Removal" },
    Service { name: "Waxing (Bikini)", urdu_name: "Bikini Waxing", price_pkr: 1500, duration: "30 minutes", description: "Bikini line waxing", category: "Hair Removal" },
    Service { name: "Moroccan Bath", urdu_name: "Moroccan Bath", price_pkr: 4000, duration: "2 hours", description: "Luxury Moroccan bath with scrub and massage", category: "Spa" },
    Service { name: "Turkish Bath", urdu_name: "Turkish Bath", price_pkr: 3500, duration: "1.5 hours", description: "Traditional Turkish bath experience", category: "Spa" },
    Service { name: "Body Scrub", urdu_name: "Jism Ki Safai", price_pkr: 2000, duration: "1 hour", description: "Full body exfoliation scrub", category: "Spa" },
    Service { name: "Body Massage", urdu_name: "Jism Ki Malish", price_pkr: 3000, duration: "1 hour", description: "Relaxing full body massage", category: "Spa" },
    Service { name: "Back Massage", urdu_name: "Peeth Ki Malish", price_pkr: 1500, duration: "30 minutes", description: "Therapeutic back massage", category: "Spa" },
    Service { name: "Aromatherapy", urdu_name: "Aromatherapy", price_pkr: 4000, duration: "1.5 hours", description: "Aromatherapy massage with essential oils", category: "Spa" },
];

pub const STAFF: &[StaffMember] = &[
    StaffMember { name: "Sara Khan", role: "Senior Hair Stylist", specialty: "Hair Coloring & Styling", experience: "8 years" },
    StaffMember { name: "Ahmed Ali", role: "Master Barber", specialty: "Men's Haircuts & Beard Styling", experience: "10 years" },
    StaffMember { name: "Fatima Noor", role: "Beauty Expert", specialty: "Facials, Makeup & Skincare", experience: "6 years" },
    StaffMember { name: "Hassan Raza", role: "Junior Stylist", specialty: "Basic Haircuts & Styling", experience: "3 years" },
    StaffMember { name: "Ayesha Malik", role: "Bridal Makeup Artist", specialty: "Bridal & Party Makeup", experience: "7 years" },
    StaffMember { name: "Zainab Sheikh", role: "Nail Art Specialist", specialty: "Nail Art & Gel Extensions", experience: "5 years" },
    StaffMember { name: "Bilal Ahmed", role: "Senior Barber", specialty: "Men's Grooming & Hair Treatments", experience: "9 years" },
    StaffMember { name: "Hina Aslam", role: "Skin Care Specialist", specialty: "Facials & Skin Treatments", experience: "6 years" },
    StaffMember { name: "Usman Khan", role: "Hair Treatment Expert", specialty: "Hair Spa, Rebonding & Straightening", experience: "8 years" },
    StaffMember { name: "Rabia Ali", role: "Spa Therapist", specialty: "Body Massage & Spa Treatments", experience: "4 years" },
];

pub const PACKAGES: &[Package] = &[
    Package { name: "Bridal Package", urdu_name: "Dulhan Package", price_pkr: 50000, services: &["Bridal Makeup", "Hair Styling", "Manicure", "Pedicure", "Facial Treatment", "Trial Session"], validity: "Valid for wedding day + 1 trial" },
    Package { name: "Groom Package", urdu_name: "Dulha Package", price_pkr: 8000, services: &["Haircut", "Beard Styling", "Facial", "Manicure", "Head Massage"], validity: "Valid for wedding day" },
    Package { name: "Monthly Membership", urdu_name: "Maahana Membership", price_pkr: 5000, services: &["2 Haircuts", "1 Facial", "20% off on all other services"], validity: "30 days from purchase" },
    Package { name: "Party Makeup Package", urdu_name: "Party Makeup Package", price_pkr: 8000, services: &["Party Makeup", "Hair Styling", "Threading", "Manicure"], validity: "Single use" },
    Package { name: "Engagement Package", urdu_name: "Mangni Package", price_pkr: 12000, services: &["Engagement Makeup", "Hair Styling", "Manicure", "Pedicure", "Facial"], validity: "Single use" },
    Package { name: "Mehndi Package", urdu_name: "Mehndi Package", price_pkr: 10000, services: &["Mehndi Makeup", "Hair Styling", "Manicure", "Pedicure", "Threading"], validity: "Single use" },
    Package { name: "Hair Care Package", urdu_name: "Baalon Ki Dekhbhal Package", price_pkr: 4000, services: &["Hair Spa", "Hair Treatment", "Hair Wash & Blow Dry", "Head Massage"], validity: "30 days from purchase" },
    Package { name: "Beauty Package", urdu_name: "Beauty Package", price_pkr: 3500, services: &["Facial", "Manicure", "Pedicure", "Threading", "Hair Wash"], validity: "30 days from purchase" },
    Package { name: "Spa Package", urdu_name: "Spa Package", price_pkr: 6000, services: &["Moroccan Bath", "Body Scrub", "Body Massage", "Facial"], validity: "30 days from purchase" },
    Package { name: "Men's Grooming Package", urdu_name: "Mardana Grooming Package", price_pkr: 2500, services: &["Haircut", "Beard Styling", "Facial", "Head Massage", "Manicure"], validity: "30 days from purchase" },
];

pub const DISCOUNTS: &[Discount] = &[
    Discount { kind: "First Visit", amount: "10%", description: "10% discount on first visit", terms: "Valid on all services" },
    Discount { kind: "Package Discount", amount: "20%", description: "20% off on all packages", terms: "Cannot be combined with other offers" },
    Discount { kind: "Student Discount", amount: "15%", description: "15% discount for students", terms: "Valid student ID required" },
    Discount { kind: "Senior Citizen", amount: "10%", description: "10% discount for senior citizens (60+)", terms: "Age verification required" },
    Discount { kind: "Weekday Discount", amount: "15%", description: "15% discount on Tuesday to Thursday", terms: "Valid Tuesday to Thursday only" },
    Discount { kind: "Referral Discount", amount: "500 PKR", description: "500 PKR discount when you refer a friend", terms: "Friend must make a purchase" },
    Discount { kind: "Birthday Discount", amount: "20%", description: "20% discount on your birthday month", terms: "Valid ID proof required" },
    Discount { kind: "Group Discount", amount: "10%", description: "10% discount for groups of 3 or more", terms: "Minimum 3 people required" },
];

const ADDRESS: &str = "Shop #12, Badar Commercial Street, DHA Phase 5, Karachi";
const LANDMARK: &str = "Near Agha Khan Hospital";
const EMAIL: &str = "info@glamsalon.pk";
const INSTAGRAM: &str = "@glamsalon.pk";

/// Rendered salon knowledge, one string per section.
pub struct SalonFacts {
    salon: SalonConfig,
}

impl SalonFacts {
    pub fn new(salon: SalonConfig) -> Self {
        Self { salon }
    }

    fn services_in(category: &str) -> String {
        SERVICES
            .iter()
            .filter(|s| s.category == category)
            .map(|s| {
                format!(
                    "{} ({}): PKR {}, {}. {}.",
                    s.name, s.urdu_name, s.price_pkr, s.duration, s.description
                )
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn services_section(&self) -> String {
        let categories = ["Hair", "Skin", "Nails", "Makeup", "Hair Removal", "Spa"];
        let body = categories
            .iter()
            .map(|c| format!("{c} services. {}", Self::services_in(c)))
            .collect::<Vec<_>>()
            .join("\n");
        format!("Services at {}:\n{body}", self.salon.name)
    }

    pub fn timings_section(&self) -> String {
        format!(
            "Timings for {}: Tuesday to Saturday (Mangal se Hafta) 10:00 AM to 8:00 PM. \
             Sunday (Itwaar) 11:00 AM to 9:00 PM. Monday (Peer) closed, weekly off.",
            self.salon.name
        )
    }

    pub fn location_section(&self) -> String {
        format!(
            "Location of {}: {ADDRESS}. Landmark: {LANDMARK}. Phone and WhatsApp: {}. \
             Email: {EMAIL}. Instagram: {INSTAGRAM}.",
            self.salon.name, self.salon.phone
        )
    }

    pub fn staff_section(&self) -> String {
        let body = STAFF
            .iter()
            .map(|s| {
                format!(
                    "{} - {}, specialty {}, {} experience.",
                    s.name, s.role, s.specialty, s.experience
                )
            })
            .collect::<Vec<_>>()
            .join(" ");
        format!("Staff at {} (available Tuesday to Sunday): {body}", self.salon.name)
    }

    pub fn packages_section(&self) -> String {
        let body = PACKAGES
            .iter()
            .map(|p| {
                format!(
                    "{} ({}): PKR {}. Includes {}. {}.",
                    p.name,
                    p.urdu_name,
                    p.price_pkr,
                    p.services.join(", "),
                    p.validity
                )
            })
            .collect::<Vec<_>>()
            .join(" ");
        format!("Packages at {}: {body}", self.salon.name)
    }

    pub fn discounts_section(&self) -> String {
        let body = DISCOUNTS
            .iter()
            .map(|d| format!("{} ({}): {}. {}.", d.kind, d.amount, d.description, d.terms))
            .collect::<Vec<_>>()
            .join(" ");
        format!("Discounts at {}: {body}", self.salon.name)
    }

    pub fn booking_section(&self) -> String {
        format!(
            "Booking at {}: by phone call, WhatsApp, walk-in, or Instagram DM. \
             Phone and WhatsApp: {}. Advance booking recommended for weekends and \
             packages (weekend aur packages ke liye pehle se booking zaroori). \
             Walk-ins welcome, subject to availability (bina booking bhi aa sakte \
             hain agar khali ho).",
            self.salon.name, self.salon.phone
        )
    }

    pub fn policies_section(&self) -> String {
        format!(
            "Policies at {}: Cancellation - cancel 2 hours before appointment. \
             Payment - cash, card, and mobile banking accepted. Hygiene - sanitized \
             tools and equipment for every customer. Refunds - no refunds, but \
             rescheduling allowed with 2 hours notice. Late arrival may result in \
             shortened service time.",
            self.salon.name
        )
    }

    pub fn amenities_section(&self) -> String {
        format!(
            "Amenities at {}: free basement parking, free WiFi for customers, \
             comfortable waiting area with refreshments, latest fashion and beauty \
             magazines, ambient music.",
            self.salon.name
        )
    }

    /// All sections in a stable order, with their section labels.
    pub fn sections(&self) -> Vec<(&'static str, String)> {
        vec![
            ("services", self.services_section()),
            ("timings", self.timings_section()),
            ("location", self.location_section()),
            ("staff", self.staff_section()),
            ("packages", self.packages_section()),
            ("discounts", self.discounts_section()),
            ("booking", self.booking_section()),
            ("policies", self.policies_section()),
            ("amenities", self.amenities_section()),
        ]
    }

    /// Documents for vector-store ingestion: one per service, package, and
    /// discount, plus one per informational section.
    pub fn documents(&self) -> Vec<KnowledgeDoc> {
        let mut docs = Vec::new();
        let mut next_id = 1u64;
        let mut push = |docs: &mut Vec<KnowledgeDoc>, category: &str, content: String| {
            let mut metadata = HashMap::new();
            metadata.insert("category".to_string(), Value::String(category.to_string()));
            docs.push(KnowledgeDoc {
                id: next_id,
                content,
                metadata,
            });
            next_id += 1;
        };

        for s in SERVICES {
            push(
                &mut docs,
                "service",
                format!(
                    "{} ({}): PKR {}, duration {}. {}. Category: {}.",
                    s.name, s.urdu_name, s.price_pkr, s.duration, s.description, s.category
                ),
            );
        }
        for p in PACKAGES {
            push(
                &mut docs,
                "package",
                format!(
                    "{} ({}): PKR {}. Includes {}. {}.",
                    p.name,
                    p.urdu_name,
                    p.price_pkr,
                    p.services.join(", "),
                    p.validity
                ),
            );
        }
        for d in DISCOUNTS {
            push(
                &mut docs,
                "discount",
                format!("{} ({}): {}. {}.", d.kind, d.amount, d.description, d.terms),
            );
        }
        push(&mut docs, "info", self.timings_section());
        push(&mut docs, "info", self.location_section());
        push(&mut docs, "info", self.staff_section());
        push(&mut docs, "info", self.booking_section());
        push(&mut docs, "info", self.policies_section());
        push(&mut docs, "info", self.amenities_section());
        docs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts() -> SalonFacts {
        SalonFacts::new(SalonConfig::default())
    }

    #[test]
    fn test_services_section_has_haircut_prices() {
        let section = facts().services_section();
        assert!(section.contains("Haircut (Men)"));
        assert!(section.contains("PKR 500"));
        assert!(section.contains("Haircut (Women)"));
        assert!(section.contains("PKR 1000"));
    }

    #[test]
    fn test_sections_are_stable() {
        let a: Vec<String> = facts().sections().into_iter().map(|(_, s)| s).collect();
        let b: Vec<String> = facts().sections().into_iter().map(|(_, s)| s).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_every_section_names_the_salon() {
        for (label, text) in facts().sections() {
            assert!(text.contains("Glam Beauty Salon"), "section {label} misses salon name");
        }
    }

    #[test]
    fn test_documents_have_unique_ids() {
        let docs = facts().documents();
        let mut ids: Vec<u64> = docs.iter().map(|d| d.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), docs.len());
        assert_eq!(docs.len(), SERVICES.len() + PACKAGES.len() + DISCOUNTS.len() + 6);
    }

    #[test]
    fn test_contact_details_present() {
        let location = facts().location_section();
        assert!(location.contains("+92-300-1234567"));
        assert!(location.contains("DHA Phase 5"));
    }
}
