//! Region naming: boundary-file names versus dataset names, and the labels
//! shown in the sidebar.

/// Boundary-file feature name → dataset region name.
///
/// Several boundary spellings collapse onto one dataset region; the Negros
/// Island Region is reported under Region VII.
static MAP_NAMES: &[(&str, &str)] = &[
    ("National Capital Region", "NCR"),
    ("Metropolitan Manila", "NCR"),
    ("NCR", "NCR"),
    ("Cordillera Administrative Region", "CAR"),
    ("CAR", "CAR"),
    ("Ilocos Region", "Region I"),
    ("Region I", "Region I"),
    ("Cagayan Valley", "Region II"),
    ("Region II", "Region II"),
    ("Central Luzon", "Region III"),
    ("Region III", "Region III"),
    ("CALABARZON", "Region IV-A"),
    ("Region IV-A", "Region IV-A"),
    ("MIMAROPA", "MIMAROPA"),
    ("Mimaropa", "MIMAROPA"),
    ("Region IV-B", "MIMAROPA"),
    ("Bicol Region", "Region V"),
    ("Region V", "Region V"),
    ("Western Visayas", "Region VI"),
    ("Region VI", "Region VI"),
    ("Central Visayas", "Region VII"),
    ("Region VII", "Region VII"),
    ("Negros Island Region", "Region VII"),
    ("Eastern Visayas", "Region VIII"),
    ("Region VIII", "Region VIII"),
    ("Zamboanga Peninsula", "Region IX"),
    ("Region IX", "Region IX"),
    ("Northern Mindanao", "Region X"),
    ("Region X", "Region X"),
    ("Davao Region", "Region XI"),
    ("Region XI", "Region XI"),
    ("SOCCSKSARGEN", "Region XII"),
    ("Soccsksargen", "Region XII"),
    ("Region XII", "Region XII"),
    ("Caraga", "Caraga"),
    ("Region XIII", "Caraga"),
    ("Autonomous Region in Muslim Mindanao", "BARMM"),
    ("Bangsamoro Autonomous Region in Muslim Mindanao", "BARMM"),
    ("BARMM", "BARMM"),
];

/// Resolves a boundary-file name to the dataset's region name.
/// Surrounding whitespace is ignored; unknown names pass through trimmed.
pub fn dataset_name(map_name: &str) -> &str {
    let map_name = map_name.trim();
    MAP_NAMES
        .iter()
        .find(|(from, _)| *from == map_name)
        .map_or(map_name, |(_, to)| *to)
}

/// Sidebar label for a region: compact names such as `RegionV` gain a space
/// after "Region"; everything else is shown as is.
pub fn display_name(region: &str) -> String {
    match region.strip_prefix("Region") {
        Some(rest) if !rest.is_empty() && !region.contains(' ') => format!("Region {rest}"),
        _ => region.to_string(),
    }
}
