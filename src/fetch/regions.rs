use crate::types::region::Region;

/// A geographical coordinate: latitude first, longitude second.
///
/// ```
/// use climate_energy::LatLon;
///
/// let goa = LatLon(15.4909, 73.8278);
/// assert_eq!(goa.0, 15.4909);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

/// Sampling points for Indian states and union territories, taken at the state capitals.
pub const INDIAN_REGIONS: [(&str, LatLon); 29] = [
    ("Andhra Pradesh", LatLon(16.5412, 80.5154)),
    ("Arunachal Pradesh", LatLon(27.0844, 93.6053)),
    ("Assam", LatLon(26.1445, 91.7362)),
    ("Bihar", LatLon(25.5941, 85.1376)),
    ("Chhattisgarh", LatLon(21.2514, 81.6296)),
    ("Delhi", LatLon(28.61, 77.20)),
    ("Goa", LatLon(15.4909, 73.8278)),
    ("Gujarat", LatLon(23.2156, 72.6369)),
    ("Haryana", LatLon(30.7333, 76.7794)),
    ("Himachal Pradesh", LatLon(31.1048, 77.1734)),
    ("Jharkhand", LatLon(23.3441, 85.3094)),
    ("Karnataka", LatLon(12.9716, 77.5946)),
    ("Kerala", LatLon(8.5241, 76.9366)),
    ("Madhya Pradesh", LatLon(23.2599, 77.4126)),
    ("Maharashtra", LatLon(19.0760, 72.8777)),
    ("Manipur", LatLon(24.8170, 93.9368)),
    ("Meghalaya", LatLon(25.5788, 91.8933)),
    ("Mizoram", LatLon(23.7271, 92.7176)),
    ("Nagaland", LatLon(25.6751, 94.1086)),
    ("Odisha", LatLon(20.2961, 85.8245)),
    ("Punjab", LatLon(30.7333, 76.7794)),
    ("Rajasthan", LatLon(26.9124, 75.7873)),
    ("Sikkim", LatLon(27.3314, 88.6138)),
    ("Tamil Nadu", LatLon(13.0827, 80.2707)),
    ("Telangana", LatLon(17.3850, 78.4867)),
    ("Tripura", LatLon(23.8315, 91.2868)),
    ("Uttar Pradesh", LatLon(26.8467, 80.9462)),
    ("Uttarakhand", LatLon(30.3165, 78.0322)),
    ("West Bengal", LatLon(22.5726, 88.3639)),
];

/// Looks up the sampling point for a region, ignoring case and extra whitespace.
pub fn coordinates_for(region: &str) -> Option<LatLon> {
    let wanted = Region::new(region)?;
    INDIAN_REGIONS
        .iter()
        .find(|(name, _)| Region::new(name).as_ref() == Some(&wanted))
        .map(|&(_, location)| location)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case_and_spacing() {
        assert_eq!(
            coordinates_for("  tamil   NADU "),
            Some(LatLon(13.0827, 80.2707))
        );
        assert_eq!(coordinates_for("Atlantis"), None);
        assert_eq!(coordinates_for(""), None);
    }

    #[test]
    fn region_names_are_unique() {
        let mut names: Vec<_> = INDIAN_REGIONS
            .iter()
            .filter_map(|(name, _)| Region::new(name))
            .collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), INDIAN_REGIONS.len());
    }
}
