//! HTML page rendering.
//!
//! Pages are built as strings over a shared shell. Values that originate
//! outside the artifacts (the requested driver code) are escaped before
//! interpolation.

use crate::artifacts::{ModelData, PredictionRow};

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <style>\n\
         body {{ font-family: sans-serif; margin: 2em auto; max-width: 60em; }}\n\
         table {{ border-collapse: collapse; width: 100%; }}\n\
         th, td {{ border: 1px solid #ccc; padding: 0.4em 0.8em; text-align: left; }}\n\
         th {{ background: #222; color: #fff; }}\n\
         .error {{ color: #a00; }}\n\
         nav a {{ margin-right: 1em; }}\n\
         </style>\n</head>\n<body>\n\
         <nav><a href=\"/\">Predictions</a><a href=\"/about\">About</a></nav>\n\
         {body}\n</body>\n</html>\n"
    )
}

pub fn error_page(message: &str) -> String {
    page(
        "Singapore GP Predictions",
        &format!("<h1 class=\"error\">{}</h1>", escape(message)),
    )
}

pub const DATA_NOT_FOUND: &str =
    "Model data not found. Run the modeling pipeline to produce the artifacts first.";

pub fn index_page(data: Option<&ModelData>) -> String {
    let Some(data) = data else {
        return error_page(DATA_NOT_FOUND);
    };

    let mut body = String::with_capacity(2048);
    body.push_str(&format!(
        "<h1>{} Grand Prix {} — Predictions</h1>\n",
        data.summary.race, data.summary.year
    ));
    body.push_str(&format!(
        "<p>Predicted winner: <strong>{}</strong> ({:.1}% win probability, {} model, generated {})</p>\n",
        data.summary.predicted_winner,
        data.summary.win_probability * 100.0,
        data.summary.model,
        data.summary.generated_at
    ));

    body.push_str("<h2>Top 10</h2>\n<table>\n<tr><th>#</th><th>Driver</th><th>Team</th><th>Win Probability</th><th>Predicted Position</th></tr>\n");
    for (i, p) in data.top_predictions(10).iter().enumerate() {
        body.push_str(&format!(
            "<tr><td>{}</td><td><a href=\"/driver/{}\">{}</a></td><td>{}</td><td>{:.1}%</td><td>{:.1}</td></tr>\n",
            i + 1,
            p.driver,
            p.driver,
            p.team,
            p.win_probability * 100.0,
            p.predicted_position
        ));
    }
    body.push_str("</table>\n");

    body.push_str("<h2>Teams</h2>\n<table>\n<tr><th>Team</th><th>Total Win Probability</th><th>Drivers</th></tr>\n");
    for t in data.team_analysis() {
        body.push_str(&format!(
            "<tr><td>{}</td><td>{:.1}%</td><td>{}</td></tr>\n",
            t.team,
            t.total_win_probability * 100.0,
            t.drivers
        ));
    }
    body.push_str("</table>\n");

    page("Singapore GP Predictions", &body)
}

pub fn driver_page(driver: &PredictionRow, data: &ModelData) -> String {
    let mut body = String::with_capacity(512);
    body.push_str(&format!("<h1>{}</h1>\n", driver.driver));
    body.push_str(&format!(
        "<p>{} — {} Grand Prix {}</p>\n",
        driver.team, data.summary.race, data.summary.year
    ));
    body.push_str("<table>\n");
    body.push_str(&format!(
        "<tr><th>Win Probability</th><td>{:.1}%</td></tr>\n",
        driver.win_probability * 100.0
    ));
    body.push_str(&format!(
        "<tr><th>Predicted Position</th><td>{:.1}</td></tr>\n",
        driver.predicted_position
    ));
    body.push_str("</table>\n");

    page(&format!("{} — Prediction", driver.driver), &body)
}

pub fn about_page() -> String {
    let body = "<h1>About</h1>\n\
        <p>This dashboard presents precomputed predictions for the Singapore\n\
        Grand Prix, built from historical race results, championship\n\
        standings, and race-day weather. The data pipeline collects the\n\
        underlying tables from public motorsport APIs; an offline modeling\n\
        run produces the artifacts rendered here.</p>\n\
        <p>Predictions are probabilistic estimates, not guarantees.</p>";
    page("About", body)
}
