use reqwest::Client;
use serde_json::json;

#[tokio::main]
async fn main() {
    let base = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://localhost:8900".to_string());

    let client = Client::new();

    let login = client
        .post(format!("{base}/login"))
        .json(&json!({ "usuario": "tester", "senha": "tester" }))
        .send()
        .await
        .unwrap();
    println!("login: {}", login.status());

    let next_id = client
        .get(format!("{base}/next-id"))
        .send()
        .await
        .unwrap();
    println!("next-id: {}", next_id.text().await.unwrap());

    let save = client
        .post(format!("{base}/manifests"))
        .json(&json!({
            "voo": "la_3344",
            "origem": "gru",
            "destino": "mao",
            "companhia": "LATAM Cargo",
            "volumes": 12,
            "peso_kg": 843.5,
            "recebido_em": "2025-08-07T06:10",
            "observacoes": "carga de teste"
        }))
        .send()
        .await
        .unwrap();
    println!("save: {}", save.status());
    println!("{}", save.text().await.unwrap());
}
