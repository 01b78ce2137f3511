//! Demo data for `delicious serve --seed`.

use delicious_core::{accounts::NewUser, types::GeoPoint, Location, StoreDraft};

use crate::state::AppState;

pub const DEMO_EMAIL: &str = "wes@example.com";
pub const DEMO_PASSWORD: &str = "wes";

struct Demo {
    name: &'static str,
    description: &'static str,
    tags: &'static [&'static str],
    lng: f64,
    lat: f64,
    address: &'static str,
}

const DEMO_STORES: &[Demo] = &[
    Demo {
        name: "Wild Wing Cafe",
        description: "Wings, beer and a patio that never closes.",
        tags: &["Family Friendly", "Licensed"],
        lng: -79.3832,
        lat: 43.6532,
        address: "100 Queen St W, Toronto",
    },
    Demo {
        name: "Coffee Pourhouse",
        description: "Single origin pour overs and good wifi.",
        tags: &["Wifi", "Open Late"],
        lng: -79.3871,
        lat: 43.6426,
        address: "290 Bremner Blvd, Toronto",
    },
    Demo {
        name: "Taco Tuesday",
        description: "Tacos every day of the week, despite the name.",
        tags: &["Vegetarian", "Family Friendly"],
        lng: -79.4000,
        lat: 43.6500,
        address: "450 Spadina Ave, Toronto",
    },
    Demo {
        name: "Bagel Brothers",
        description: "Hand rolled bagels, wood fired since dawn.",
        tags: &["Vegan", "Wifi"],
        lng: -79.3957,
        lat: 43.6677,
        address: "Bloor St W, Toronto",
    },
    Demo {
        name: "Night Owl Noodles",
        description: "Hand pulled noodles until 3am.",
        tags: &["Open Late", "Licensed"],
        lng: -79.4112,
        lat: 43.6547,
        address: "College St, Toronto",
    },
];

/// Register the demo user and add the demo stores under their name.
pub async fn seed(state: &AppState) -> anyhow::Result<()> {
    let user = state
        .users
        .register(NewUser {
            name: "Wes".to_string(),
            email: DEMO_EMAIL.to_string(),
            password: DEMO_PASSWORD.to_string(),
        })
        .await?;

    for demo in DEMO_STORES {
        let draft = StoreDraft {
            name: demo.name.to_string(),
            description: demo.description.to_string(),
            tags: demo.tags.iter().map(|t| t.to_string()).collect(),
            location: Location::new(GeoPoint::new(demo.lng, demo.lat), demo.address),
        };
        state.stores.create(draft, user.id).await?;
    }

    tracing::info!(stores = DEMO_STORES.len(), email = DEMO_EMAIL, "seed: demo data loaded");
    Ok(())
}
