//! Authentication properties and the append-only store that holds them.
//!
//! A [`Property`] is a `(name, value)` pair of byte strings. Values are
//! binary-safe: a PEM certificate, a raw IP address, or a UTF-8 common name
//! are all stored the same way. The [`PropertyStore`] keeps properties in
//! insertion order and allows duplicate names (several `x509_subject_alternative_name`
//! entries are alternative identity claims, not conflicts).

use core::fmt;

/// Property name carrying the transport security type (e.g. `"ssl"`).
pub const TRANSPORT_SECURITY_TYPE_PROPERTY_NAME: &str = "transport_security_type";
/// Transport security type value for TLS.
pub const SSL_TRANSPORT_SECURITY_TYPE: &str = "ssl";
/// Property name for the peer certificate's subject common name.
pub const X509_CN_PROPERTY_NAME: &str = "x509_common_name";
/// Property name for each subject alternative name of the peer certificate.
pub const X509_SAN_PROPERTY_NAME: &str = "x509_subject_alternative_name";
/// Property name for the PEM-encoded peer certificate.
pub const X509_PEM_CERT_PROPERTY_NAME: &str = "x509_pem_cert";
/// Property name for the PEM-encoded peer certificate chain.
pub const X509_PEM_CERT_CHAIN_PROPERTY_NAME: &str = "x509_pem_cert_chain";
/// Property name recording whether the TLS session was resumed.
pub const SSL_SESSION_REUSED_PROPERTY: &str = "ssl_session_reused";
/// Property name for the negotiated security level.
pub const SECURITY_LEVEL_PROPERTY_NAME: &str = "security_level";
/// Property name for each DNS SAN of the peer certificate.
pub const PEER_DNS_PROPERTY_NAME: &str = "peer_dns";
/// Property name for the peer's SPIFFE ID.
pub const PEER_SPIFFE_ID_PROPERTY_NAME: &str = "peer_spiffe_id";
/// Property name for each URI SAN of the peer certificate.
pub const PEER_URI_PROPERTY_NAME: &str = "peer_uri";
/// Property name for each email SAN of the peer certificate.
pub const PEER_EMAIL_PROPERTY_NAME: &str = "peer_email";
/// Property name for each IP SAN of the peer certificate.
pub const PEER_IP_PROPERTY_NAME: &str = "peer_ip";

/// A single authentication fact: a byte-string name bound to a byte-string value.
///
/// # Example
///
/// ```
/// use asupersync_authctx::security::Property;
///
/// let p = Property::new("x509_common_name", "svc.example");
/// assert_eq!(p.name(), b"x509_common_name");
/// assert_eq!(p.value_str(), Some("svc.example"));
///
/// let raw = Property::new("peer_ip", vec![10u8, 0, 0, 1]);
/// assert_eq!(raw.value_len(), 4);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Property {
    name: Box<[u8]>,
    value: Box<[u8]>,
}

impl Property {
    /// Creates a property from anything convertible to owned bytes.
    #[must_use]
    pub fn new(name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into().into_boxed_slice(),
            value: value.into().into_boxed_slice(),
        }
    }

    /// Returns the property name.
    #[must_use]
    pub fn name(&self) -> &[u8] {
        &self.name
    }

    /// Returns the property value.
    #[must_use]
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Returns the name as UTF-8, or `None` if it is not valid UTF-8.
    #[must_use]
    pub fn name_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.name).ok()
    }

    /// Returns the value as UTF-8, or `None` if it is not valid UTF-8.
    #[must_use]
    pub fn value_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.value).ok()
    }

    /// Returns the value length in bytes.
    #[must_use]
    pub fn value_len(&self) -> usize {
        self.value.len()
    }

    /// Returns `true` if this property is named `name`.
    #[must_use]
    pub fn has_name(&self, name: &[u8]) -> bool {
        *self.name == *name
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &String::from_utf8_lossy(&self.name))
            .field("value", &String::from_utf8_lossy(&self.value))
            .finish()
    }
}

/// Insertion-ordered multimap of properties owned by one context.
///
/// The store only grows: there is no API to remove or reorder entries, so an
/// index handed out once stays valid for the lifetime of the owner.
/// Lookup by name is an iterator concern, see
/// [`AuthContext::find_properties_by_name`](super::AuthContext::find_properties_by_name).
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PropertyStore {
    array: Vec<Property>,
}

impl PropertyStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self { array: Vec::new() }
    }

    /// Appends a property. Amortized O(1); never fails.
    pub fn add(&mut self, property: Property) {
        self.array.push(property);
    }

    /// Number of properties in this store (ancestors not included).
    #[must_use]
    pub fn count(&self) -> usize {
        self.array.len()
    }

    /// Alias for [`count`](Self::count).
    #[must_use]
    pub fn len(&self) -> usize {
        self.array.len()
    }

    /// Returns `true` if the store holds no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    /// Returns the property at `index`, in insertion order.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Property> {
        self.array.get(index)
    }

    /// Returns all properties as a slice, in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[Property] {
        &self.array
    }

    /// Iterates this store only, in insertion order.
    pub fn iter(&self) -> core::slice::Iter<'_, Property> {
        self.array.iter()
    }

    /// Returns `true` if at least one property is named `name`.
    #[must_use]
    pub fn contains_name(&self, name: &[u8]) -> bool {
        self.array.iter().any(|p| p.has_name(name))
    }
}

impl fmt::Debug for PropertyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.array.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a PropertyStore {
    type Item = &'a Property;
    type IntoIter = core::slice::Iter<'a, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
