/// Column values written when an address is created or overwritten.
#[derive(Debug, Clone, Default)]
pub struct AddressWriteRequest {
    pub address: Option<String>,
    pub street: Option<String>,
    pub hamlet: Option<String>,
    pub ward: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub position_url: Option<String>,
}
