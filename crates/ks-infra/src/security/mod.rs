pub mod hmac_mac;

pub use hmac_mac::HmacSha256Mac;
