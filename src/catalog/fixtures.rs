//! Bundled catalog data.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal_macros::dec;

use super::model::{
    CryptoCurrency, DonationCategory, DonationHistory, DonationOpportunity, Donor, Geography,
    ProofType, Recipient,
};

fn at(year: i32, month: u32, day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, min, 0))
        .map(|n| n.and_utc())
        .unwrap_or_default()
}

fn placeholders(n: usize) -> Vec<String> {
    vec!["/placeholder.svg".to_string(); n]
}

fn place(country: &str, city: Option<&str>, global: bool) -> Geography {
    Geography {
        country: country.to_string(),
        city: city.map(str::to_string),
        global,
    }
}

pub fn opportunities() -> Vec<DonationOpportunity> {
    vec![
        DonationOpportunity {
            id: "1".into(),
            title: "Clean Water Initiative in Rural Tanzania".into(),
            summary: "Providing clean drinking water to 10 villages in rural Tanzania through \
                solar-powered filtration systems.".into(),
            category: DonationCategory::Community,
            location: place("Tanzania", Some("Arusha"), false),
            proof_type: ProofType::Images,
            description: "We have worked with communities in rural Tanzania for three years on \
                access to clean drinking water. This project brings solar-powered filtration \
                systems to 10 villages where contamination has caused repeated outbreaks. The \
                systems serve roughly 5,000 people and last at least 10 years with basic \
                maintenance."
                .into(),
            proof_urls: placeholders(3),
            recipient_address: "0x1234567890abcdef1234567890abcdef12345678".into(),
            goal_amount: dec!(50000),
            raised_amount: dec!(12500),
            created_at: at(2023, 9, 15, 10, 30),
            recipient_id: "r1".into(),
            featured: true,
            impact: "With $1,000, we can provide one complete water filtration system that serves \
                approximately 500 people.".into(),
        },
        DonationOpportunity {
            id: "2".into(),
            title: "Coding Bootcamp for Underserved Youth".into(),
            summary: "Providing tech education and coding skills to 100 students from low-income \
                communities in Mexico City.".into(),
            category: DonationCategory::Education,
            location: place("Mexico", Some("Mexico City"), false),
            proof_type: ProofType::Multiple,
            description: "A 12-week intensive bootcamp teaching web development fundamentals, \
                JavaScript frameworks and backend technologies to 100 young adults from \
                underserved communities, with job placement support after graduation. Previous \
                cohorts reached a 70% employment rate within six months."
                .into(),
            proof_urls: placeholders(2),
            recipient_address: "0x2345678901abcdef2345678901abcdef23456789".into(),
            goal_amount: dec!(75000),
            raised_amount: dec!(45000),
            created_at: at(2023, 8, 5, 14, 20),
            recipient_id: "r2".into(),
            featured: true,
            impact: "With $1,000, we can provide full scholarships for two students for the entire \
                bootcamp.".into(),
        },
        DonationOpportunity {
            id: "3".into(),
            title: "Reforestation Project in the Amazon".into(),
            summary: "Planting 50,000 native trees to restore 100 acres of deforested land in the \
                Brazilian Amazon.".into(),
            category: DonationCategory::Environment,
            location: place("Brazil", Some("Manaus"), true),
            proof_type: ProofType::Images,
            description: "Working with indigenous communities and environmental scientists, we \
                select native species for degraded areas and maintain each planting for three \
                years. The project employs local community members and each restored acre captures \
                about 300 tons of CO2 over 30 years."
                .into(),
            proof_urls: placeholders(4),
            recipient_address: "0x3456789012abcdef3456789012abcdef34567890".into(),
            goal_amount: dec!(100000),
            raised_amount: dec!(28000),
            created_at: at(2023, 10, 20, 9, 15),
            recipient_id: "r3".into(),
            featured: false,
            impact: "With $1,000, we can plant and maintain approximately 500 trees, restoring 1 \
                acre of rainforest.".into(),
        },
        DonationOpportunity {
            id: "4".into(),
            title: "Mobile Health Clinic for Remote Communities".into(),
            summary: "Establishing a mobile health clinic to provide basic healthcare to 15 remote \
                villages in northern India.".into(),
            category: DonationCategory::Healthcare,
            location: place("India", Some("Himachal Pradesh"), false),
            proof_type: ProofType::Documents,
            description: "A mobile clinic staffed by a doctor, a nurse and a community health \
                worker will visit 15 mountain villages on a bi-weekly rotation, offering \
                preventive care, maternal and child health services and health education to about \
                12,000 people."
                .into(),
            proof_urls: placeholders(1),
            recipient_address: "0x4567890123abcdef4567890123abcdef45678901".into(),
            goal_amount: dec!(85000),
            raised_amount: dec!(37500),
            created_at: at(2023, 7, 10, 11, 45),
            recipient_id: "r4".into(),
            featured: true,
            impact: "With $1,000, we can fund the mobile clinic operations for approximately one \
                week, caring for around 200 patients.".into(),
        },
        DonationOpportunity {
            id: "5".into(),
            title: "Open Source AI Research for Climate Solutions".into(),
            summary: "Developing open-source AI models to optimize renewable energy systems and \
                reduce carbon emissions.".into(),
            category: DonationCategory::Research,
            location: place("Global", None, true),
            proof_type: ProofType::Text,
            description: "A distributed team of AI researchers, climate scientists and energy \
                engineers building open models that integrate renewable sources into existing \
                grids, forecast demand and cut waste. Everything we produce is published openly; \
                early models improved efficiency by 15-20% in test scenarios."
                .into(),
            proof_urls: placeholders(1),
            recipient_address: "0x5678901234abcdef5678901234abcdef56789012".into(),
            goal_amount: dec!(150000),
            raised_amount: dec!(62000),
            created_at: at(2023, 11, 5, 16, 30),
            recipient_id: "r5".into(),
            featured: false,
            impact: "With $1,000, we can fund approximately 40 hours of research and development \
                time.".into(),
        },
        DonationOpportunity {
            id: "6".into(),
            title: "Community Art Center Renovation".into(),
            summary: "Renovating an abandoned building into a community art center in Detroit, \
                providing creative space for local youth.".into(),
            category: DonationCategory::Arts,
            location: place("United States", Some("Detroit"), false),
            proof_type: ProofType::Multiple,
            description: "We are turning a vacant 10,000 square foot warehouse into studios for \
                visual arts, music, dance and digital media, with a small performance venue and \
                gallery. Programming for youth aged 8-18 is free or low-cost. Architecture and \
                construction labor are donated; we need funds for materials and equipment."
                .into(),
            proof_urls: placeholders(2),
            recipient_address: "0x6789012345abcdef6789012345abcdef67890123".into(),
            goal_amount: dec!(120000),
            raised_amount: dec!(75000),
            created_at: at(2023, 6, 25, 13, 20),
            recipient_id: "r6".into(),
            featured: false,
            impact: "With $1,000, we can complete the renovation of one studio space serving about \
                200 youth per year.".into(),
        },
    ]
}

pub fn recipients() -> Vec<Recipient> {
    let recipient = |id: &str,
                     name: &str,
                     wallet: &str,
                     biography: &str,
                     opportunity: &str,
                     proof_of_work: &str,
                     created_at: DateTime<Utc>| Recipient {
        id: id.to_string(),
        name: name.to_string(),
        wallet_address: wallet.to_string(),
        kyc_verified: true,
        biography: biography.to_string(),
        opportunities: vec![opportunity.to_string()],
        proof_of_work: proof_of_work.to_string(),
        created_at,
    };

    vec![
        recipient(
            "r1",
            "Tanzania Water Foundation",
            "0x1234567890abcdef1234567890abcdef12345678",
            "Non-profit organization focused on providing clean water solutions to rural \
                communities in East Africa since 2015.",
            "1",
            "Completed 15 water projects serving over 25,000 people.",
            at(2022, 5, 12, 8, 30),
        ),
        recipient(
            "r2",
            "Code for Future Mexico",
            "0x2345678901abcdef2345678901abcdef23456789",
            "Educational initiative that provides coding and digital skills training to \
                underserved communities across Mexico.",
            "2",
            "Trained over 500 students with a 70% job placement rate.",
            at(2021, 11, 30, 14, 45),
        ),
        recipient(
            "r3",
            "Amazon Reforestation Collective",
            "0x3456789012abcdef3456789012abcdef34567890",
            "Coalition of environmental scientists and indigenous communities working to restore \
                and protect the Amazon rainforest.",
            "3",
            "Successfully reforested 500 acres with 250,000 native trees.",
            at(2020, 8, 15, 10, 15),
        ),
        recipient(
            "r4",
            "Himalayan Health Initiative",
            "0x4567890123abcdef4567890123abcdef45678901",
            "Healthcare organization providing medical services to remote mountain communities in \
                northern India.",
            "4",
            "Served over 30,000 patients through existing health programs.",
            at(2021, 4, 20, 9, 30),
        ),
        recipient(
            "r5",
            "Open Climate AI Consortium",
            "0x5678901234abcdef5678901234abcdef56789012",
            "International research collective developing open-source AI solutions for climate \
                change mitigation and adaptation.",
            "5",
            "Published 8 research papers and released 3 open-source AI models.",
            at(2022, 1, 10, 16, 45),
        ),
        recipient(
            "r6",
            "Detroit Arts Revival",
            "0x6789012345abcdef6789012345abcdef67890123",
            "Community organization focused on increasing access to arts education and creative \
                spaces in underserved Detroit neighborhoods.",
            "6",
            "Operated two community art programs reaching 500 youth annually.",
            at(2021, 9, 5, 11, 20),
        ),
    ]
}

/// 32-byte hash built from a repeated 8-byte hex pattern.
fn tx_hash(pattern: &str) -> String {
    format!("0x{}", pattern.repeat(4))
}

pub fn donor() -> Donor {
    Donor {
        id: "d1".into(),
        preferred_categories: vec![
            DonationCategory::Environment,
            DonationCategory::Education,
            DonationCategory::Technology,
        ],
        preferred_geographies: vec![
            place("Global", None, true),
            place("United States", None, false),
        ],
        donation_history: vec![
            DonationHistory {
                opportunity_id: "3".into(),
                amount: dec!(500),
                currency: CryptoCurrency::Eth,
                timestamp: at(2023, 11, 15, 9, 30),
                transaction_hash: tx_hash("abcdef1234567890"),
            },
            DonationHistory {
                opportunity_id: "5".into(),
                amount: dec!(750),
                currency: CryptoCurrency::Usdc,
                timestamp: at(2023, 10, 22, 14, 15),
                transaction_hash: tx_hash("1234567890abcdef"),
            },
        ],
        show_active_only: true,
        created_at: at(2023, 6, 10, 11, 45),
    }
}
