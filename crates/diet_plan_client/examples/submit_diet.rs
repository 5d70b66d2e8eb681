use diet_plan_client::config::Config;
use diet_plan_client::http_client::ReqwestDietPlanClient;
use diet_plan_client::{DietError, RawDietInput, submit_form};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example: DIET_FORM_HOST=localhost targets a backend on localhost:3333
    let cfg = Config::from_env()?;
    let client = ReqwestDietPlanClient::from_config(&cfg)?;

    let raw: RawDietInput = serde_json::from_value(serde_json::json!({
        "nome": "Ana",
        "idade": 27,
        "altura_cm": 165,
        "peso_kg": 60,
        "sexo": "feminino",
        "nivel_atividade": "sedentario",
        "objetivo": "perda_de_peso"
    }))?;

    match submit_form(&client, &raw).await {
        Ok(plan) => println!("{}", serde_json::to_string_pretty(&plan)?),
        Err(DietError::Validation(errors)) => {
            for (field, err) in errors.iter() {
                eprintln!("{field}: {}", err.message);
            }
        }
        Err(e) => eprintln!("submission failed: {e}"),
    }
    Ok(())
}
