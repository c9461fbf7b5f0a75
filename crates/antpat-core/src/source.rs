//! Far-field simulation sources
//!
//! A simulation output file holds one or more named far-field requests,
//! each sampled on a (θ, φ) mesh in degrees at one or more frequencies.
//! File parsing is left to implementors of [`FarFieldSource`];
//! [`RequestSet`] is the in-memory implementation.

use ndarray::Array2;
use tracing::debug;

use crate::types::{ComplexGrid, FieldError, FieldResult};

/// One named far-field request.
#[derive(Debug, Clone, PartialEq)]
pub struct FarFieldRequest {
    pub name: String,
    /// Hz, strictly ascending
    pub frequencies: Vec<f64>,
    pub theta_deg: Array2<f64>,
    pub phi_deg: Array2<f64>,
    /// One mesh per frequency
    pub e_theta: Vec<ComplexGrid>,
    /// One mesh per frequency
    pub e_phi: Vec<ComplexGrid>,
}

/// Anything that can hand out named far-field requests.
pub trait FarFieldSource {
    /// Names of the available requests, in file order.
    fn request_names(&self) -> Vec<String>;

    /// Look up a request by name.
    fn request(&self, name: &str) -> Option<&FarFieldRequest>;
}

/// Pick a request by name, or the sole request when no name is given.
pub fn select_request<'a, S>(source: &'a S, name: Option<&str>) -> FieldResult<&'a FarFieldRequest>
where
    S: FarFieldSource + ?Sized,
{
    let selected = match name {
        Some(name) => source
            .request(name)
            .ok_or_else(|| FieldError::RequestNotFound(name.to_string()))?,
        None => {
            let names = source.request_names();
            match names.as_slice() {
                [only] => source
                    .request(only)
                    .ok_or_else(|| FieldError::RequestNotFound(only.clone()))?,
                [] => return Err(FieldError::RequestNotFound("<none>".to_string())),
                _ => return Err(FieldError::AmbiguousSelection { available: names }),
            }
        }
    };
    debug!(request = %selected.name, "Selected far-field request");
    Ok(selected)
}

/// In-memory collection of requests.
#[derive(Debug, Clone, Default)]
pub struct RequestSet {
    requests: Vec<FarFieldRequest>,
}

impl RequestSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a request, replacing any with the same name.
    pub fn insert(&mut self, request: FarFieldRequest) {
        match self.requests.iter_mut().find(|r| r.name == request.name) {
            Some(slot) => *slot = request,
            None => self.requests.push(request),
        }
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

impl FromIterator<FarFieldRequest> for RequestSet {
    fn from_iter<I: IntoIterator<Item = FarFieldRequest>>(iter: I) -> Self {
        let mut set = RequestSet::new();
        for r in iter {
            set.insert(r);
        }
        set
    }
}

impl FarFieldSource for RequestSet {
    fn request_names(&self) -> Vec<String> {
        self.requests.iter().map(|r| r.name.clone()).collect()
    }

    fn request(&self, name: &str) -> Option<&FarFieldRequest> {
        self.requests.iter().find(|r| r.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::TangentialField;
    use crate::types::Complex;

    fn request(name: &str, freqs: &[f64]) -> FarFieldRequest {
        let theta_deg = Array2::from_shape_fn((3, 4), |(i, _)| 45.0 * (i + 1) as f64);
        let phi_deg = Array2::from_shape_fn((3, 4), |(_, j)| 90.0 * j as f64);
        let mesh = |k: usize| Array2::from_shape_fn((3, 4), |(i, j)| Complex::new((k * 100 + i * 10 + j) as f64, 0.0));
        FarFieldRequest {
            name: name.to_string(),
            frequencies: freqs.to_vec(),
            theta_deg,
            phi_deg,
            e_theta: (0..freqs.len()).map(mesh).collect(),
            e_phi: (0..freqs.len()).map(|k| mesh(k).mapv(|z| z * Complex::i())).collect(),
        }
    }

    #[test]
    fn test_sole_request_selected_without_name() {
        let set: RequestSet = [request("FF1", &[1.0e8])].into_iter().collect();
        assert_eq!(select_request(&set, None).unwrap().name, "FF1");
    }

    #[test]
    fn test_two_requests_need_a_name() {
        let set: RequestSet = [request("FF1", &[1.0e8]), request("FF2", &[1.0e8])].into_iter().collect();
        match select_request(&set, None) {
            Err(FieldError::AmbiguousSelection { available }) => {
                assert_eq!(available, vec!["FF1".to_string(), "FF2".to_string()]);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(select_request(&set, Some("FF2")).unwrap().name, "FF2");
    }

    #[test]
    fn test_unknown_name() {
        let set: RequestSet = [request("FF1", &[1.0e8])].into_iter().collect();
        assert_eq!(
            select_request(&set, Some("FF9")).unwrap_err(),
            FieldError::RequestNotFound("FF9".to_string())
        );
        assert!(select_request(&RequestSet::new(), None).is_err());
    }

    #[test]
    fn test_insert_replaces_same_name() {
        let mut set = RequestSet::new();
        set.insert(request("FF1", &[1.0e8]));
        set.insert(request("FF1", &[1.0e8, 2.0e8]));
        assert_eq!(set.len(), 1);
        assert_eq!(set.request("FF1").unwrap().frequencies.len(), 2);
    }

    #[test]
    fn test_field_from_request() {
        let req = request("FF1", &[1.0e8, 2.0e8]);
        let field = TangentialField::from_request(&req).unwrap();
        assert_eq!(field.radii(), Some(&[1.0e8, 2.0e8][..]));
        assert_eq!(field.stacks().0.dim(), (2, 3, 4));
        assert!((field.grid().theta()[[0, 0]] - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
        let (th, ph) = field.components_at(Some(2.0e8)).unwrap();
        assert_eq!(th[[2, 3]], Complex::new(123.0, 0.0));
        assert_eq!(ph[[2, 3]], Complex::new(0.0, 123.0));
    }

    #[test]
    fn test_request_component_count_checked() {
        let mut req = request("FF1", &[1.0e8, 2.0e8]);
        req.e_phi.pop();
        assert!(matches!(
            TangentialField::from_request(&req),
            Err(FieldError::ShapeMismatch { what: "Ephi", .. })
        ));
    }
}
