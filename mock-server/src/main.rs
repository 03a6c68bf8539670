use petfriends_mock::{Account, AppState, Pet};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let email = std::env::var("PETFRIENDS_EMAIL").unwrap_or_else(|_| "demo@petfriends.test".to_string());
    let password = std::env::var("PETFRIENDS_PASSWORD").unwrap_or_else(|_| "demo".to_string());

    // Someone else's pet, so listing all pets is never empty.
    let shelter_pet = Pet {
        id: uuid::Uuid::new_v4().to_string(),
        name: "Murka".to_string(),
        animal_type: "cat".to_string(),
        age: "2".to_string(),
        pet_photo: String::new(),
        user_id: "shelter".to_string(),
    };
    let state = AppState::with_pets(vec![Account::new(&email, &password)], vec![shelter_pet]);

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, %email, "mock pet service listening");
    petfriends_mock::run(listener, state).await
}
