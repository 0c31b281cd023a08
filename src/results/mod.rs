use crate::models::PredictionResult;
use crate::session::{SessionStore, RESULT_KEY};
use anyhow::{Context, Result};
use serde_json::Value;

/// Read the last stored prediction, if any
pub async fn load_result<S: SessionStore + ?Sized>(store: &S) -> Result<Option<PredictionResult>> {
    let Some(raw) = store.get(RESULT_KEY).await? else {
        return Ok(None);
    };

    let result = serde_json::from_str(&raw).context("Stored prediction result is malformed")?;
    Ok(Some(result))
}

/// Text rendering of the results page
pub fn render(result: &PredictionResult) -> String {
    let input = &result.input;
    let mut out = String::new();

    if result.predictions.is_empty() {
        out.push_str("No predictions returned\n");
    } else {
        for (i, prediction) in result.predictions.iter().enumerate() {
            out.push_str(&format!(
                "{}. Predicted price: {}\n",
                i + 1,
                format_prediction(prediction)
            ));
        }
    }

    let accuracy = result
        .accuracy
        .map(|a| format!("{a:.3}"))
        .unwrap_or_else(|| "n/a".to_string());

    let amenities: Vec<&str> = [
        ("main road", input.mainroad),
        ("guest room", input.guestroom),
        ("basement", input.basement),
        ("hot water heating", input.hotwaterheating),
        ("air conditioning", input.airconditioning),
        ("preferred area", input.prefarea),
    ]
    .iter()
    .filter(|(_, present)| *present)
    .map(|(name, _)| *name)
    .collect();
    let features = if amenities.is_empty() {
        "none".to_string()
    } else {
        amenities.join(", ")
    };

    out.push_str(&format!(
        "   Model: {}\n",
        result.model_version.as_deref().unwrap_or("n/a")
    ));
    out.push_str(&format!("   Accuracy: {}\n", accuracy));
    out.push_str(&format!(
        "   {} m², {} bedrooms, {} bathrooms, {} stories, {} parking\n",
        input.area, input.bedrooms, input.bathrooms, input.stories, input.parking
    ));
    out.push_str(&format!("   Features: {}\n", features));
    out.push_str(&format!(
        "   Furnishing: {}\n",
        input.furnishingstatus.as_deref().unwrap_or("unspecified")
    ));

    out
}

fn format_prediction(value: &Value) -> String {
    match value.as_f64() {
        Some(price) => format!("{price:.2}"),
        None => value.to_string(),
    }
}
