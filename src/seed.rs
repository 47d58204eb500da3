//! Starter vocabulary written into a fresh workspace.

use crate::error::Result;
use crate::store::PatternStore;

struct SeedCategory {
    name: &'static str,
    description: &'static str,
    color: &'static str,
}

struct SeedLabel {
    category: &'static str,
    name: &'static str,
    description: &'static str,
    patterns: &'static [&'static str],
    keywords: &'static [&'static str],
}

const CATEGORIES: &[SeedCategory] = &[
    SeedCategory { name: "home", description: "Household expenses and maintenance", color: "#FF6B6B" },
    SeedCategory { name: "dad", description: "Dad's personal expenses", color: "#4ECDC4" },
    SeedCategory { name: "mom", description: "Mom's personal expenses", color: "#95E77E" },
    SeedCategory { name: "business", description: "Business expenses", color: "#9B59B6" },
    SeedCategory { name: "data_communication", description: "Data and communication expenses", color: "#3498DB" },
    SeedCategory { name: "motors", description: "Vehicle expenses and maintenance", color: "#E67E22" },
    SeedCategory { name: "groceries", description: "Grocery shopping and household items", color: "#2ECC71" },
    SeedCategory { name: "health", description: "Healthcare and medical expenses", color: "#E74C3C" },
    SeedCategory { name: "entertainment", description: "Entertainment and leisure", color: "#F39C12" },
    SeedCategory { name: "education", description: "Education and learning expenses", color: "#8E44AD" },
    SeedCategory { name: "savings", description: "Savings and investments", color: "#16A085" },
    SeedCategory { name: "other", description: "Miscellaneous expenses", color: "#95A5A6" },
];

const LABELS: &[SeedLabel] = &[
    SeedLabel {
        category: "home",
        name: "rent_mortgage",
        description: "Bond payments or rent",
        patterns: &["bond payment", "rent payment", "property levy", "municipal rates"],
        keywords: &["bond", "rent", "mortgage", "property", "levy", "rates"],
    },
    SeedLabel {
        category: "home",
        name: "utilities",
        description: "Electricity, water, rates and internet",
        patterns: &["eskom", "city power", "municipality", "telkom", "vodacom fibre", "rain internet"],
        keywords: &["eskom", "electricity", "water", "rates", "municipal", "telkom", "internet"],
    },
    SeedLabel {
        category: "home",
        name: "maintenance",
        description: "Home repairs and maintenance",
        patterns: &["builder warehouse", "built it", "game", "checkers", "home depot", "builders"],
        keywords: &["builder", "built it", "maintenance", "repair", "home", "builders"],
    },
    SeedLabel {
        category: "dad",
        name: "personal_care",
        description: "Personal grooming and care",
        patterns: &["barber", "clicks", "dis-chem", "gym", "pharmacy"],
        keywords: &["barber", "haircut", "clicks", "dis-chem", "gym", "personal", "pharmacy"],
    },
    SeedLabel {
        category: "dad",
        name: "motors_transport",
        description: "Vehicle and transport costs",
        patterns: &["sasol", "engen", "bp", "shell", "total", "car wash", "tyres", "uber", "taxi"],
        keywords: &["sasol", "engen", "bp", "shell", "fuel", "petrol", "car", "tyres", "uber", "taxi"],
    },
    SeedLabel {
        category: "dad",
        name: "work_lunch",
        description: "Work-related food expenses",
        patterns: &["woolworths food", "kfc", "mcdonalds", "debonairs", "steers", "wimpy"],
        keywords: &["lunch", "work", "parking", "toll", "kfc", "mcdonalds", "debonairs"],
    },
    SeedLabel {
        category: "mom",
        name: "personal_care",
        description: "Personal grooming and care",
        patterns: &["salon", "spa", "clicks", "dis-chem", "beauty", "cosmetics"],
        keywords: &["salon", "spa", "nails", "beauty", "cosmetics", "skincare"],
    },
    SeedLabel {
        category: "mom",
        name: "shopping_clothing",
        description: "Clothing and shopping",
        patterns: &["edgars", "jet", "pick n pay", "shoprite", "woolworths", "truworths"],
        keywords: &["edgars", "jet", "clothing", "fashion", "retail", "shop", "woolworths"],
    },
    SeedLabel {
        category: "mom",
        name: "groceries_household",
        description: "Grocery shopping",
        patterns: &["pick n pay", "shoprite", "checkers", "woolworths food", "spar"],
        keywords: &["grocery", "food", "supermarket", "pick n pay", "shoprite", "spar", "checkers"],
    },
    SeedLabel {
        category: "business",
        name: "office",
        description: "Office and company expenses",
        patterns: &["business account", "office", "company"],
        keywords: &["business", "office", "company", "work"],
    },
    SeedLabel {
        category: "business",
        name: "supplies_equipment",
        description: "Business supplies and equipment",
        patterns: &["maker", "cash and carry", "stationery", "pioneer"],
        keywords: &["supplies", "equipment", "tools", "stationery", "office", "pioneer", "cash and carry"],
    },
    SeedLabel {
        category: "data_communication",
        name: "mobile_data",
        description: "Mobile phone and data",
        patterns: &["vodacom", "mtn", "cell c", "rain", "telkom mobile", "airtime", "data"],
        keywords: &["vodacom", "mtn", "cell c", "rain", "data", "airtime", "mobile"],
    },
    SeedLabel {
        category: "data_communication",
        name: "internet",
        description: "Home internet and connectivity",
        patterns: &["telkom", "fibre", "vox", "webconnex", "openserve", "vuma"],
        keywords: &["telkom", "fibre", "internet", "adsl", "webconnex", "openserve", "vuma"],
    },
    SeedLabel {
        category: "motors",
        name: "fuel",
        description: "Fuel and petrol costs",
        patterns: &["sasol", "engen", "bp", "shell", "total", "caltex", "garage"],
        keywords: &["sasol", "engen", "bp", "shell", "fuel", "petrol", "diesel", "garage"],
    },
    SeedLabel {
        category: "motors",
        name: "maintenance_repairs",
        description: "Vehicle maintenance and repairs",
        patterns: &["fit it", "hi-q", "bidvest", "tyre plus", "car wash", "service", "brakes"],
        keywords: &["fit it", "hi-q", "tyre", "brake", "service", "car wash", "maintenance", "repairs"],
    },
    SeedLabel {
        category: "motors",
        name: "insurance_licensing",
        description: "Vehicle insurance and licensing",
        patterns: &["outsurance", "miway", "discovery insure", "license", "disc", "registration"],
        keywords: &["insurance", "license", "disc", "outsurance", "miway", "discovery", "registration"],
    },
];

/// Build a store holding the starter categories and labels.
pub fn default_store() -> Result<PatternStore> {
    let mut store = PatternStore::new();
    for cat in CATEGORIES {
        store.create_category(cat.name, cat.description, Some(cat.color))?;
    }
    for label in LABELS {
        let patterns: Vec<String> = label.patterns.iter().map(|s| s.to_string()).collect();
        let keywords: Vec<String> = label.keywords.iter().map(|s| s.to_string()).collect();
        store.create_label(label.category, label.name, label.description, &patterns, &keywords)?;
    }
    Ok(store)
}
