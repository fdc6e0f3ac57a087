//! Static reference data used to populate the registration form.

use serde::Serialize;

/// A selectable country and its first-level regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Country {
    pub code: &'static str,
    pub name: &'static str,
    pub states: &'static [&'static str],
}

pub static COUNTRIES: &[Country] = &[
    Country {
        code: "US",
        name: "United States",
        states: &[
            "Alabama", "Alaska", "Arizona", "Arkansas", "California", "Colorado", "Connecticut",
            "Delaware", "Florida", "Georgia", "Hawaii", "Idaho", "Illinois", "Indiana", "Iowa",
            "Kansas", "Kentucky", "Louisiana", "Maine", "Maryland", "Massachusetts", "Michigan",
            "Minnesota", "Mississippi", "Missouri", "Montana", "Nebraska", "Nevada", "New Hampshire",
            "New Jersey", "New Mexico", "New York", "North Carolina", "North Dakota", "Ohio",
            "Oklahoma", "Oregon", "Pennsylvania", "Rhode Island", "South Carolina", "South Dakota",
            "Tennessee", "Texas", "Utah", "Vermont", "Virginia", "Washington", "West Virginia",
            "Wisconsin", "Wyoming",
        ],
    },
    Country {
        code: "CA",
        name: "Canada",
        states: &[
            "Alberta", "British Columbia", "Manitoba", "New Brunswick", "Newfoundland and Labrador",
            "Northwest Territories", "Nova Scotia", "Nunavut", "Ontario", "Prince Edward Island",
            "Quebec", "Saskatchewan", "Yukon",
        ],
    },
    Country {
        code: "GB",
        name: "United Kingdom",
        states: &[
            "England", "Scotland", "Wales", "Northern Ireland",
        ],
    },
    Country {
        code: "AU",
        name: "Australia",
        states: &[
            "Australian Capital Territory", "New South Wales", "Northern Territory", "Queensland",
            "South Australia", "Tasmania", "Victoria", "Western Australia",
        ],
    },
    Country {
        code: "IN",
        name: "India",
        states: &[
            "Andhra Pradesh", "Arunachal Pradesh", "Assam", "Bihar", "Chhattisgarh", "Goa", "Gujarat",
            "Haryana", "Himachal Pradesh", "Jharkhand", "Karnataka", "Kerala", "Madhya Pradesh",
            "Maharashtra", "Manipur", "Meghalaya", "Mizoram", "Nagaland", "Odisha", "Punjab",
            "Rajasthan", "Sikkim", "Tamil Nadu", "Telangana", "Tripura", "Uttar Pradesh",
            "Uttarakhand", "West Bengal", "Andaman and Nicobar Islands", "Chandigarh",
            "Dadra and Nagar Haveli and Daman and Diu", "Delhi", "Jammu and Kashmir", "Ladakh",
            "Lakshadweep", "Puducherry",
        ],
    },
    Country {
        code: "DE",
        name: "Germany",
        states: &[
            "Baden-Württemberg", "Bavaria", "Berlin", "Brandenburg", "Bremen", "Hamburg", "Hesse",
            "Lower Saxony", "Mecklenburg-Vorpommern", "North Rhine-Westphalia", "Rhineland-Palatinate",
            "Saarland", "Saxony", "Saxony-Anhalt", "Schleswig-Holstein", "Thuringia",
        ],
    },
    Country {
        code: "FR",
        name: "France",
        states: &[
            "Auvergne-Rhône-Alpes", "Bourgogne-Franche-Comté", "Brittany", "Centre-Val de Loire",
            "Corsica", "Grand Est", "Hauts-de-France", "Île-de-France", "Normandy",
            "Nouvelle-Aquitaine", "Occitania", "Pays de la Loire", "Provence-Alpes-Côte d'Azur",
        ],
    },
    Country {
        code: "JP",
        name: "Japan",
        states: &[
            "Aichi", "Akita", "Aomori", "Chiba", "Ehime", "Fukui", "Fukuoka", "Fukushima", "Gifu",
            "Gunma", "Hiroshima", "Hokkaido", "Hyogo", "Ibaraki", "Ishikawa", "Iwate", "Kagawa",
            "Kagoshima", "Kanagawa", "Kochi", "Kumamoto", "Kyoto", "Mie", "Miyagi", "Miyazaki",
            "Nagano", "Nagasaki", "Nara", "Niigata", "Oita", "Okayama", "Okinawa", "Osaka", "Saga",
            "Saitama", "Shiga", "Shimane", "Shizuoka", "Tochigi", "Tokushima", "Tokyo", "Tottori",
            "Toyama", "Wakayama", "Yamagata", "Yamaguchi", "Yamanashi",
        ],
    },
    Country {
        code: "BR",
        name: "Brazil",
        states: &[
            "Acre", "Alagoas", "Amapá", "Amazonas", "Bahia", "Ceará", "Distrito Federal",
            "Espírito Santo", "Goiás", "Maranhão", "Mato Grosso", "Mato Grosso do Sul", "Minas Gerais",
            "Pará", "Paraíba", "Paraná", "Pernambuco", "Piauí", "Rio de Janeiro",
            "Rio Grande do Norte", "Rio Grande do Sul", "Rondônia", "Roraima", "Santa Catarina",
            "São Paulo", "Sergipe", "Tocantins",
        ],
    },
    Country {
        code: "MX",
        name: "Mexico",
        states: &[
            "Aguascalientes", "Baja California", "Baja California Sur", "Campeche", "Chiapas",
            "Chihuahua", "Coahuila", "Colima", "Durango", "Guanajuato", "Guerrero", "Hidalgo",
            "Jalisco", "México", "Michoacán", "Morelos", "Nayarit", "Nuevo León", "Oaxaca", "Puebla",
            "Querétaro", "Quintana Roo", "San Luis Potosí", "Sinaloa", "Sonora", "Tabasco",
            "Tamaulipas", "Tlaxcala", "Veracruz", "Yucatán", "Zacatecas",
        ],
    },
    Country {
        code: "OTHER",
        name: "Other",
        states: &[
            "Please specify in comments",
        ],
    },
];

/// Suggested industries; the schema accepts free text as well.
pub static INDUSTRIES: &[&str] = &[
    "Technology",
    "Healthcare",
    "Finance",
    "Education",
    "Manufacturing",
    "Retail",
    "Construction",
    "Transportation",
    "Hospitality",
    "Real Estate",
    "Marketing/Advertising",
    "Media/Entertainment",
    "Non-profit",
    "Government",
    "Agriculture",
    "Energy",
    "Consulting",
    "Legal",
    "Other",
];

#[must_use]
pub fn country_by_code(code: &str) -> Option<&'static Country> {
    COUNTRIES.iter().find(|country| country.code == code)
}

/// Regions of `code`, empty for unknown countries.
#[must_use]
pub fn states_for(code: &str) -> &'static [&'static str] {
    country_by_code(code).map(|country| country.states).unwrap_or_default()
}

#[must_use]
pub fn is_known_state(code: &str, state: &str) -> bool {
    states_for(code).contains(&state)
}
