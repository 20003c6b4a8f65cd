//! Backend response envelopes that carry formatter input.
//!
//! Workout plans arrive as `ApiResponse<WorkoutData>` with the markdown in
//! `generatedContent`; coaching analyses carry it in `recommendation`.

use std::fmt::Write;

use serde::Deserialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayloadKind {
    /// Raw message text
    #[default]
    Text,
    Workout,
    Coaching,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub cost: Option<f64>,
}

impl<T> ApiResponse<T> {
    fn into_data(self) -> Result<T> {
        if !self.success {
            return Err(Error::Backend(
                self.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        self.data
            .ok_or_else(|| Error::Backend("response carried no data".to_string()))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Exercise {
    pub name: String,
    pub sets: u32,
    pub reps: String,
    pub rest_seconds: Option<u32>,
    pub description: String,
    pub position_benefit: Option<String>,
    pub game_application: Option<String>,
    pub injury_prevention: Option<String>,
    pub coaching_cue: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkoutData {
    pub id: String,
    pub title: String,
    pub description: String,
    pub estimated_duration: u32,
    pub exercises: Vec<Exercise>,
    pub focus_areas: Vec<String>,
    pub created_at: String,
    pub sport: String,
    pub position: String,
    pub workout_title: Option<String>,
    pub position_focus: Option<String>,
    pub generated_content: Option<String>,
}

impl WorkoutData {
    /// The markdown to show for this plan. Uses the generated content when the
    /// backend produced any, otherwise summarises the structured plan.
    pub fn display_text(&self) -> String {
        match self.generated_content.as_deref() {
            Some(content) if !content.trim().is_empty() => content.to_string(),
            _ => self.summary(),
        }
    }

    fn summary(&self) -> String {
        let mut out = String::new();
        let title = self.workout_title.as_deref().unwrap_or(&self.title);

        // Writing to a String cannot fail
        let _ = writeln!(out, "# {}", title);
        if !self.sport.is_empty() || !self.position.is_empty() {
            let _ = writeln!(out, "{} • {}", self.sport, self.position);
        }
        if !self.description.is_empty() {
            let _ = writeln!(out, "\n{}", self.description);
        }
        if self.estimated_duration > 0 {
            let _ = writeln!(out, "\n**Duration:** {} min", self.estimated_duration);
        }

        if !self.focus_areas.is_empty() {
            let _ = writeln!(out, "\n## Focus Areas");
            for area in &self.focus_areas {
                let _ = writeln!(out, "- {}", area);
            }
        }

        if !self.exercises.is_empty() {
            let _ = writeln!(out, "\n## Exercises");
            for (index, exercise) in self.exercises.iter().enumerate() {
                let _ = write!(
                    out,
                    "{}. **{}** {} sets • {} reps",
                    index + 1,
                    exercise.name,
                    exercise.sets,
                    exercise.reps
                );
                if let Some(rest) = exercise.rest_seconds {
                    let _ = write!(out, " • {}:{:02} rest", rest / 60, rest % 60);
                }
                out.push('\n');
                if !exercise.description.is_empty() {
                    let _ = writeln!(out, "- {}", exercise.description);
                }
                if let Some(cue) = &exercise.coaching_cue {
                    let _ = writeln!(out, "- **Cue:** \"{}\"", cue);
                }
            }
        }

        out
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoachingAnalysis {
    pub recommendation: String,
}

/// Pull the text to format out of `input`.
pub fn extract_text(kind: PayloadKind, input: &str) -> Result<String> {
    match kind {
        PayloadKind::Text => Ok(input.to_string()),
        PayloadKind::Workout => {
            let response: ApiResponse<WorkoutData> = serde_json::from_str(input)?;
            if let Some(cost) = response.cost {
                tracing::debug!(cost, "workout generation cost");
            }
            let workout = response.into_data()?;
            if workout.generated_content.is_none() {
                tracing::info!(id = %workout.id, "no generated content, summarising plan");
            }
            Ok(workout.display_text())
        }
        PayloadKind::Coaching => {
            let response: ApiResponse<CoachingAnalysis> = serde_json::from_str(input)?;
            Ok(response.into_data()?.recommendation)
        }
    }
}
