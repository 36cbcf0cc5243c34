use mongodb::{
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client,
};
use std::sync::Arc;
use std::time::Duration;

/// Build the shared MongoDB client. Pool and selection timeouts are
/// bounded so a dead cluster fails requests instead of hanging them.
pub async fn create_mongo_client(uri: &str) -> Arc<Client> {
    let mut client_options = ClientOptions::parse(uri)
        .await
        .expect("MONGODB_URI is not a valid connection string");

    client_options.connect_timeout = Some(Duration::from_secs(10));
    client_options.server_selection_timeout = Some(Duration::from_secs(10));
    client_options.max_pool_size = Some(10);
    client_options.min_pool_size = Some(1);

    let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
    client_options.server_api = Some(server_api);

    let client =
        Client::with_options(client_options).expect("Failed to create MongoDB client with options");

    // The startup ping is advisory only. The driver connects lazily and
    // reconnects on demand, so a cluster that is slow at boot should not
    // keep the API from coming up.
    match client
        .database("Trips")
        .run_command(mongodb::bson::doc! {"ping": 1})
        .await
    {
        Ok(_) => println!("Connected to MongoDB"),
        Err(e) => eprintln!("WARNING: MongoDB ping failed at startup: {}", e),
    }

    Arc::new(client)
}
