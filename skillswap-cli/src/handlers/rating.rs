//! Rating handlers.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use skillswap::{SkillSwapClient, UserId};

use crate::output::{stars, PlainPrint, TableRow};

/// Rating summary of one teacher.
#[derive(Debug, Clone, Serialize)]
pub struct TeacherRatingInfo {
    pub teacher_uid: String,
    pub average: f64,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_score: Option<i32>,
}

impl TableRow for TeacherRatingInfo {
    fn headers() -> Vec<&'static str> {
        vec!["Teacher", "Average", "Ratings", "Mine"]
    }
    fn row(&self) -> Vec<String> {
        vec![
            self.teacher_uid.clone(),
            format!("{:.1}", self.average),
            self.count.to_string(),
            self.my_score.map(|s| s.to_string()).unwrap_or_default(),
        ]
    }
}

impl PlainPrint for TeacherRatingInfo {
    fn plain_print(&self) {
        print!(
            "{} {} {:.1} {}",
            self.teacher_uid.green(),
            stars(self.average).yellow(),
            self.average,
            format!("({})", self.count).dimmed()
        );
        match self.my_score {
            Some(score) => println!(" {}", format!("[you: {}]", score).cyan()),
            None => println!(),
        }
    }
}

/// Rate a teacher.
pub async fn give(client: &SkillSwapClient, teacher: &str, score: i32) -> Result<TeacherRatingInfo> {
    let summary = client.ratings().submit(teacher, score).await?;
    Ok(TeacherRatingInfo {
        teacher_uid: teacher.to_string(),
        average: summary.average,
        count: summary.count,
        my_score: Some(score),
    })
}

/// Ratings of one teacher, with the signed-in user's score if any.
pub async fn show(client: &SkillSwapClient, teacher: &str) -> Result<TeacherRatingInfo> {
    let rated = client.ratings().for_teacher(teacher).await?;
    let my_score = client.current_uid().and_then(|me| {
        rated
            .ratings
            .iter()
            .find(|r| r.rater_id == me)
            .map(|r| r.score)
    });
    Ok(TeacherRatingInfo {
        teacher_uid: teacher.to_string(),
        average: rated.summary.average,
        count: rated.summary.count,
        my_score,
    })
}

/// Every rated teacher, best first.
pub async fn averages(client: &SkillSwapClient) -> Result<Vec<TeacherRatingInfo>> {
    let ratings = client.ratings().all().await?;
    let mut teachers: Vec<UserId> = ratings.iter().map(|r| r.teacher_id.clone()).collect();
    teachers.sort();
    teachers.dedup();

    let mut rows: Vec<TeacherRatingInfo> = teachers
        .into_iter()
        .map(|teacher| {
            let summary = skillswap::engine::summary_for(&ratings, &teacher);
            TeacherRatingInfo {
                teacher_uid: teacher.to_string(),
                average: summary.average,
                count: summary.count,
                my_score: None,
            }
        })
        .collect();
    rows.sort_by(|a, b| b.average.total_cmp(&a.average));
    Ok(rows)
}
