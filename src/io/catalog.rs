// src/io/catalog.rs

use crate::error::CatalogError;
use crate::model::supplier::{Supplier, MAX_QUALITY};
use log::info;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

/// Reads a supplier catalog CSV (`id,name,price,quality,time,capacity`) into an owned
/// snapshot. Every row is validated; duplicate ids are rejected.
pub fn load_catalog(file_path: impl AsRef<Path>) -> Result<Vec<Supplier>, CatalogError> {
    let path = file_path.as_ref();
    let file = std::fs::File::open(path)?;
    let suppliers = read_catalog(file)?;
    info!("loaded {} suppliers from '{}'", suppliers.len(), path.display());
    Ok(suppliers)
}

pub fn read_catalog<R: Read>(reader: R) -> Result<Vec<Supplier>, CatalogError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut seen = HashSet::new();
    let mut suppliers = Vec::new();

    for record in rdr.deserialize() {
        let supplier: Supplier = record?;
        supplier.validate()?;
        if !seen.insert(supplier.id) {
            return Err(CatalogError::DuplicateId(supplier.id));
        }
        suppliers.push(supplier);
    }

    Ok(suppliers)
}

pub fn write_catalog(file_path: impl AsRef<Path>, suppliers: &[Supplier]) -> Result<(), CatalogError> {
    let mut wtr = csv::Writer::from_path(file_path)?;
    for supplier in suppliers {
        wtr.serialize(supplier)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Parameters for a randomly generated demo catalog.
#[derive(Debug, Clone)]
pub struct SyntheticCatalog {
    pub mean_price: f64,
    pub price_std_dev: f64,
    pub max_lead_time: u32,
    pub min_capacity: u64,
    pub max_capacity: u64,
}

impl Default for SyntheticCatalog {
    fn default() -> Self {
        Self {
            mean_price: 100.0,
            price_std_dev: 20.0,
            max_lead_time: 30,
            min_capacity: 50,
            max_capacity: 500,
        }
    }
}

/// Generates `count` suppliers with normally distributed prices.
///
/// Prices are clamped at 0 and rounded to cents, quality is uniform on `[0, 10]` with one
/// decimal, lead time is a whole number of days in `1..=max_lead_time`, and capacity is
/// uniform on `min_capacity..=max_capacity`.
pub fn generate_synthetic_catalog<R: Rng + ?Sized>(
    count: usize,
    params: &SyntheticCatalog,
    rng: &mut R,
) -> Result<Vec<Supplier>, CatalogError> {
    let price_dist = Normal::new(params.mean_price, params.price_std_dev)
        .map_err(|e| CatalogError::Distribution(e.to_string()))?;
    if params.max_lead_time == 0 || params.min_capacity > params.max_capacity {
        return Err(CatalogError::Distribution(format!(
            "lead time 1..={} and capacity {}..={} must be non-empty ranges",
            params.max_lead_time, params.min_capacity, params.max_capacity
        )));
    }

    let mut suppliers = Vec::with_capacity(count);
    for i in 1..=count {
        let id = u32::try_from(i).map_err(|e| CatalogError::Distribution(e.to_string()))?;
        let price = (price_dist.sample(rng).max(0.0) * 100.0).round() / 100.0;
        let quality = (rng.gen_range(0.0..=MAX_QUALITY) * 10.0).round() / 10.0;
        let time = f64::from(rng.gen_range(1..=params.max_lead_time));
        let capacity = rng.gen_range(params.min_capacity..=params.max_capacity);

        suppliers.push(Supplier::new(
            id,
            format!("Supplier {id}"),
            price,
            quality,
            time,
            capacity,
        ));
    }

    Ok(suppliers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_read_catalog() {
        let data = "id,name,price,quality,time,capacity\n\
                    1,Acme,10.5,8,5,100\n\
                    2, Globex ,9,6.5,7,40\n";
        let suppliers = read_catalog(data.as_bytes()).unwrap();
        assert_eq!(suppliers.len(), 2);
        assert_eq!(suppliers[1].name, "Globex");
        assert_eq!(suppliers[0].capacity, 100);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let data = "id,name,price,quality,time,capacity\n1,A,1,1,1,1\n1,B,2,2,2,2\n";
        let err = read_catalog(data.as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(1)));
    }

    #[test]
    fn test_out_of_range_quality_rejected() {
        let data = "id,name,price,quality,time,capacity\n1,A,1,11,1,1\n";
        let err = read_catalog(data.as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::Invalid(_)));
    }

    #[test]
    fn test_negative_capacity_is_a_csv_error() {
        let data = "id,name,price,quality,time,capacity\n1,A,1,5,1,-3\n";
        let err = read_catalog(data.as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::Csv(_)));
    }

    #[test]
    fn test_synthetic_catalog_is_valid_and_seeded() {
        let params = SyntheticCatalog::default();
        let a = generate_synthetic_catalog(25, &params, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = generate_synthetic_catalog(25, &params, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 25);
        for s in &a {
            assert!(s.validate().is_ok());
            assert!((params.min_capacity..=params.max_capacity).contains(&s.capacity));
            assert!(s.time >= 1.0 && s.time <= f64::from(params.max_lead_time));
        }
    }

    #[test]
    fn test_synthetic_catalog_rejects_bad_params() {
        let params = SyntheticCatalog {
            price_std_dev: -1.0,
            ..SyntheticCatalog::default()
        };
        let result = generate_synthetic_catalog(3, &params, &mut StdRng::seed_from_u64(1));
        assert!(matches!(result, Err(CatalogError::Distribution(_))));
    }
}
