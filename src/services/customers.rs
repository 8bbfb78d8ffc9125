use chrono::Utc;
use tracing::{info, warn};

use super::{decode, encode, missing_fields, parse_number, present};
use crate::error::ServiceError;
use crate::geo::{Gazetteer, GeoPoint, ResolvedLocation};
use crate::models::customer::{CUSTOMER_ROLE, CurrentLocation, Customer, CustomerId};
use crate::store::{CUSTOMERS, DocumentStore, Filter};

/// Raw `create_customer` fields as extracted from the request.
#[derive(Debug, Clone, Default)]
pub struct NewCustomer {
    pub firebase_uid: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreatedCustomer {
    pub customer: Customer,
    pub location: ResolvedLocation,
}

pub async fn create_customer(
    store: &dyn DocumentStore,
    gazetteer: &Gazetteer,
    input: NewCustomer,
) -> Result<CreatedCustomer, ServiceError> {
    let (firebase_uid, name, email, phone) = match (
        present(input.firebase_uid),
        present(input.name),
        present(input.email),
        present(input.phone),
    ) {
        (Some(uid), Some(name), Some(email), Some(phone)) => (uid, name, email, phone),
        (uid, name, email, phone) => {
            return Err(missing_fields(&[
                ("firebaseUID", &uid),
                ("name", &name),
                ("email", &email),
                ("phone", &phone),
            ]));
        }
    };

    let explicit = explicit_point(present(input.latitude), present(input.longitude))?;

    store.ping().await?;

    let customer_id = CustomerId::from_auth_subject(firebase_uid.clone());
    let duplicate = Filter::eq("email", email.as_str())
        .or("firebaseUID", firebase_uid.as_str())
        .or("customerID", customer_id.as_str());
    if store.find_one(CUSTOMERS, &duplicate).await?.is_some() {
        warn!(customer_id = %customer_id, "customer already exists");
        return Err(ServiceError::DuplicateCustomer);
    }

    let location = gazetteer.locate(input.address.as_deref(), explicit);
    match &location.matched {
        Some(hit) => info!(
            customer_id = %customer_id,
            district = %hit.district_name,
            match_type = %hit.match_type,
            overridden = location.overridden,
            "address resolved"
        ),
        None if location.address.is_some() => {
            info!(customer_id = %customer_id, "address did not match any district")
        }
        None => {}
    }

    let now = Utc::now();
    let customer = Customer {
        firebase_uid,
        name,
        email,
        phone,
        role: CUSTOMER_ROLE.to_string(),
        customer_id,
        current_location: CurrentLocation {
            address: location.address.clone(),
            latitude: location.point.map(|p| p.lat),
            longitude: location.point.map(|p| p.lng),
        },
        order_history: Vec::new(),
        created_at: now,
        updated_at: now,
    };

    store.insert(CUSTOMERS, encode(&customer)?).await?;
    info!(customer_id = %customer.customer_id, "customer created");

    Ok(CreatedCustomer { customer, location })
}

pub async fn get_customer(
    store: &dyn DocumentStore,
    customer_id: Option<String>,
) -> Result<Customer, ServiceError> {
    let customer_id =
        present(customer_id).ok_or(ServiceError::MissingFields(vec!["customer_id"]))?;

    let doc = store
        .find_one(CUSTOMERS, &Filter::eq("customerID", customer_id.as_str()))
        .await?
        .ok_or(ServiceError::CustomerNotFound(customer_id))?;

    decode(doc)
}

/// Both coordinates, or neither. A lone latitude or longitude is ignored.
fn explicit_point(
    latitude: Option<String>,
    longitude: Option<String>,
) -> Result<Option<GeoPoint>, ServiceError> {
    match (latitude, longitude) {
        (Some(lat), Some(lng)) => Ok(Some(GeoPoint {
            lat: parse_number("latitude", &lat)?,
            lng: parse_number("longitude", &lng)?,
        })),
        (None, None) => Ok(None),
        _ => {
            warn!("only one of latitude/longitude supplied; ignoring coordinates");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{GazetteerEntry, MatchType};
    use crate::store::MemoryStore;

    fn gazetteer() -> Gazetteer {
        Gazetteer::from_entries(vec![GazetteerEntry {
            name: "Downtown".to_string(),
            latitude: 1.0,
            longitude: 2.0,
            aliases: vec!["dt".to_string()],
        }])
    }

    fn input(uid: &str, email: &str) -> NewCustomer {
        NewCustomer {
            firebase_uid: Some(uid.to_string()),
            name: Some("Nadia".to_string()),
            email: Some(email.to_string()),
            phone: Some("01711111111".to_string()),
            ..NewCustomer::default()
        }
    }

    #[tokio::test]
    async fn customer_id_is_the_firebase_uid() {
        let store = MemoryStore::new();
        let created = create_customer(&store, &gazetteer(), input("uid-1", "n@example.com"))
            .await
            .unwrap();

        assert_eq!(created.customer.customer_id.as_str(), "uid-1");
        assert_eq!(created.customer.role, "customer");

        let fetched = get_customer(&store, Some("uid-1".to_string())).await.unwrap();
        assert_eq!(fetched, created.customer);
    }

    #[tokio::test]
    async fn same_email_with_new_uid_is_a_duplicate() {
        let store = MemoryStore::new();
        create_customer(&store, &gazetteer(), input("uid-1", "n@example.com"))
            .await
            .unwrap();

        let err = create_customer(&store, &gazetteer(), input("uid-2", "n@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::DuplicateCustomer);
    }

    #[tokio::test]
    async fn same_uid_with_new_email_is_a_duplicate() {
        let store = MemoryStore::new();
        create_customer(&store, &gazetteer(), input("uid-1", "a@example.com"))
            .await
            .unwrap();

        let err = create_customer(&store, &gazetteer(), input("uid-1", "b@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::DuplicateCustomer);
    }

    #[tokio::test]
    async fn missing_fields_are_reported_together() {
        let store = MemoryStore::new();
        let err = create_customer(
            &store,
            &gazetteer(),
            NewCustomer {
                firebase_uid: Some("uid-1".to_string()),
                email: Some("  ".to_string()),
                ..NewCustomer::default()
            },
        )
        .await
        .unwrap_err();

        assert_eq!(
            err,
            ServiceError::MissingFields(vec!["name", "email", "phone"])
        );
    }

    #[tokio::test]
    async fn address_alias_fills_in_coordinates() {
        let store = MemoryStore::new();
        let created = create_customer(
            &store,
            &gazetteer(),
            NewCustomer {
                address: Some("meet me dt tonight".to_string()),
                ..input("uid-1", "n@example.com")
            },
        )
        .await
        .unwrap();

        let location = &created.customer.current_location;
        assert_eq!(location.latitude, Some(1.0));
        assert_eq!(location.longitude, Some(2.0));
        assert!(created.location.auto_detected);
        assert_eq!(
            created.location.matched.as_ref().unwrap().match_type,
            MatchType::Alias
        );
    }

    #[tokio::test]
    async fn explicit_coordinates_win_over_address() {
        let store = MemoryStore::new();
        let created = create_customer(
            &store,
            &gazetteer(),
            NewCustomer {
                address: Some("Downtown".to_string()),
                latitude: Some("10.5".to_string()),
                longitude: Some("20.25".to_string()),
                ..input("uid-1", "n@example.com")
            },
        )
        .await
        .unwrap();

        let location = &created.customer.current_location;
        assert_eq!(location.latitude, Some(10.5));
        assert_eq!(location.longitude, Some(20.25));
        assert!(created.location.overridden);
        assert!(!created.location.auto_detected);
    }

    #[tokio::test]
    async fn non_numeric_latitude_is_rejected() {
        let store = MemoryStore::new();
        let err = create_customer(
            &store,
            &gazetteer(),
            NewCustomer {
                latitude: Some("north".to_string()),
                longitude: Some("2.0".to_string()),
                ..input("uid-1", "n@example.com")
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.code(), "InvalidField");
    }

    #[tokio::test]
    async fn offline_store_is_reported_as_unavailable() {
        let store = MemoryStore::new();
        store.set_online(false);

        let err = create_customer(&store, &gazetteer(), input("uid-1", "n@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::StoreUnavailable);
    }

    #[tokio::test]
    async fn unknown_customer_is_not_found() {
        let store = MemoryStore::new();
        assert_eq!(
            get_customer(&store, Some("ghost".to_string())).await,
            Err(ServiceError::CustomerNotFound("ghost".to_string()))
        );
        assert_eq!(
            get_customer(&store, None).await,
            Err(ServiceError::MissingFields(vec!["customer_id"]))
        );
    }
}
