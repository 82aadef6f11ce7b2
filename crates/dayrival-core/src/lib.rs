use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::Date;
use ulid::Ulid;

#[derive(Debug, Clone, thiserror::Error, Eq, PartialEq)]
pub enum RivalError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("no matching competition: {0}")]
    NoMatchingCompetition(String),
    #[error("unknown competition: {0}")]
    UnknownCompetition(String),
    #[error("summary rejected: {0}")]
    SummaryRejected(String),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct CompetitionId(pub Ulid);

impl CompetitionId {
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for CompetitionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for CompetitionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Bedtime,
    Wakeup,
}

impl EventKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bedtime => "bedtime",
            Self::Wakeup => "wakeup",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "bedtime" => Some(Self::Bedtime),
            "wakeup" => Some(Self::Wakeup),
            _ => None,
        }
    }
}

/// Pure scoring rule for one day: +1 per met target, -1 per missed target,
/// 0 per unreported target. Range is -2..=+2.
#[must_use]
pub fn daily_score(bedtime_success: Option<bool>, wake_up_success: Option<bool>) -> i32 {
    fn flag_score(flag: Option<bool>) -> i32 {
        match flag {
            Some(true) => 1,
            Some(false) => -1,
            None => 0,
        }
    }

    flag_score(bedtime_success) + flag_score(wake_up_success)
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyStat {
    pub user: String,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub bedtime_success: Option<bool>,
    pub wake_up_success: Option<bool>,
    pub daily_score: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Competition {
    pub id: CompetitionId,
    pub user: String,
    pub challenger: String,
    #[serde(with = "iso_date")]
    pub start_date: Date,
    #[serde(with = "iso_date")]
    pub end_date: Date,
    pub outcome: String,
    pub summary: String,
    pub daily_stats: Vec<DailyStat>,
}

impl Competition {
    #[must_use]
    pub fn involves(&self, name: &str) -> bool {
        self.user == name || self.challenger == name
    }

    #[must_use]
    pub fn covers(&self, date: Date) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Authoritative window-restricted total for one participant. Stats
    /// outside `[start_date, end_date]` are excluded defensively even though
    /// `record_stat` never produces them.
    #[must_use]
    pub fn windowed_total(&self, participant: &str) -> i32 {
        self.daily_stats
            .iter()
            .filter(|stat| stat.user == participant && self.covers(stat.date))
            .map(|stat| stat.daily_score)
            .sum()
    }

    #[must_use]
    pub fn has_ended(&self, today: Date) -> bool {
        today >= self.end_date
    }
}

/// In-memory set of competitions keyed by a stable identifier. Hosts inject
/// a store handle instead of sharing a process-wide list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct CompetitionStore {
    competitions: BTreeMap<CompetitionId, Competition>,
}

impl CompetitionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new competition between two distinct participants.
    ///
    /// The overlap rule is intentionally the narrow historical one: only the
    /// new competition's start date is tested against existing ranges, for
    /// every competition in which either party already appears in either
    /// role. A new range that swallows an existing one from the left is not
    /// rejected; see DESIGN.md.
    ///
    /// # Errors
    /// Returns [`RivalError::Validation`] when the participants are not two
    /// distinct non-empty identities, the date range is reversed, or the
    /// start date falls inside an existing competition of either party.
    pub fn start_competition(
        &mut self,
        user: &str,
        challenger: &str,
        start_date: Date,
        end_date: Date,
    ) -> Result<CompetitionId, RivalError> {
        if user == challenger {
            return Err(RivalError::Validation(
                "user and challenger must be different individuals".to_string(),
            ));
        }

        if user.trim().is_empty() || challenger.trim().is_empty() {
            return Err(RivalError::Validation(
                "participant names must be non-empty".to_string(),
            ));
        }

        if end_date < start_date {
            return Err(RivalError::Validation(format!(
                "end date {} precedes start date {}",
                format_iso_date(end_date),
                format_iso_date(start_date)
            )));
        }

        for existing in self.competitions.values() {
            if existing.covers(start_date)
                && (existing.involves(user) || existing.involves(challenger))
            {
                return Err(RivalError::Validation(format!(
                    "one of the participants is already in a competition during this time period ({} vs {}, {}..{})",
                    existing.user,
                    existing.challenger,
                    format_iso_date(existing.start_date),
                    format_iso_date(existing.end_date)
                )));
            }
        }

        let id = CompetitionId::new();
        self.competitions.insert(
            id,
            Competition {
                id,
                user: user.to_string(),
                challenger: challenger.to_string(),
                start_date,
                end_date,
                outcome: String::new(),
                summary: String::new(),
                daily_stats: Vec::new(),
            },
        );
        Ok(id)
    }

    /// Records one bedtime/wake-up outcome for `user` on `date`, creating the
    /// per-day stat on first sight and recomputing its derived score.
    ///
    /// # Errors
    /// Returns [`RivalError::NoMatchingCompetition`] when no competition has
    /// `user` as a participant with `date` inside its range.
    pub fn record_stat(
        &mut self,
        user: &str,
        date: Date,
        kind: EventKind,
        success: bool,
    ) -> Result<(), RivalError> {
        let Some(competition) = self
            .competitions
            .values_mut()
            .find(|competition| competition.involves(user) && competition.covers(date))
        else {
            return Err(RivalError::NoMatchingCompetition(format!(
                "no competition covers {user} on {}",
                format_iso_date(date)
            )));
        };

        let stat = match competition
            .daily_stats
            .iter_mut()
            .position(|stat| stat.user == user && stat.date == date)
        {
            Some(index) => &mut competition.daily_stats[index],
            None => {
                competition.daily_stats.push(DailyStat {
                    user: user.to_string(),
                    date,
                    bedtime_success: None,
                    wake_up_success: None,
                    daily_score: 0,
                });
                let last = competition.daily_stats.len() - 1;
                &mut competition.daily_stats[last]
            }
        };

        match kind {
            EventKind::Bedtime => stat.bedtime_success = Some(success),
            EventKind::Wakeup => stat.wake_up_success = Some(success),
        }
        stat.daily_score = daily_score(stat.bedtime_success, stat.wake_up_success);
        Ok(())
    }

    /// String-typed variant of [`Self::record_stat`]. The historical
    /// implementation treated an unrecognized kind as a silent no-op; here it
    /// is an explicit validation error.
    ///
    /// # Errors
    /// Returns [`RivalError::Validation`] for an unrecognized event kind and
    /// otherwise propagates [`Self::record_stat`] failures.
    pub fn record_named_stat(
        &mut self,
        user: &str,
        date: Date,
        kind: &str,
        success: bool,
    ) -> Result<(), RivalError> {
        let parsed = EventKind::parse(kind).ok_or_else(|| {
            RivalError::Validation(format!("unrecognized event kind '{kind}'"))
        })?;
        self.record_stat(user, date, parsed, success)
    }

    /// Computes (or recomputes) the final outcome once `today` has reached
    /// the end date. Before that it returns a status message and leaves the
    /// stored outcome untouched. Idempotent: the outcome is a pure function
    /// of the recorded stats.
    ///
    /// # Errors
    /// Returns [`RivalError::UnknownCompetition`] for an id the store does
    /// not hold.
    pub fn end_competition(
        &mut self,
        id: CompetitionId,
        today: Date,
    ) -> Result<String, RivalError> {
        let Some(competition) = self.competitions.get_mut(&id) else {
            return Err(RivalError::UnknownCompetition(id.to_string()));
        };

        if !competition.has_ended(today) {
            return Ok(format!(
                "Competition between {} and {} has not ended yet",
                competition.user, competition.challenger
            ));
        }

        let user = competition.user.clone();
        let challenger = competition.challenger.clone();
        let user_total = competition.windowed_total(&user);
        let challenger_total = competition.windowed_total(&challenger);

        competition.outcome = if user_total > challenger_total {
            format!(
                "{} wins! ({user_total} to {challenger_total})",
                competition.user
            )
        } else if challenger_total > user_total {
            format!(
                "{} wins! ({challenger_total} to {user_total})",
                competition.challenger
            )
        } else {
            format!("It's a tie! ({user_total} to {challenger_total})")
        };
        Ok(competition.outcome.clone())
    }

    #[must_use]
    pub fn get(&self, id: CompetitionId) -> Option<&Competition> {
        self.competitions.get(&id)
    }

    pub fn get_mut(&mut self, id: CompetitionId) -> Option<&mut Competition> {
        self.competitions.get_mut(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Competition> {
        self.competitions.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.competitions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.competitions.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationReport {
    pub valid: bool,
    pub expected_user_total: i64,
    pub expected_challenger_total: i64,
    pub message: String,
}

impl ValidationReport {
    fn rejected(message: String) -> Self {
        Self {
            valid: false,
            expected_user_total: 0,
            expected_challenger_total: 0,
            message,
        }
    }
}

const DRAW_MARKER: &str = "Draw";
const DRAW_SYNONYMS: [&str; 3] = ["draw", "tie", "tied"];

/// Cross-checks a candidate model-produced summary against the canonical
/// stats of `competition`. The model is an untrusted generator: winner,
/// totals, and highlighted dates are all recomputed here and every
/// discrepancy is reported in one aggregated message.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::float_cmp, clippy::too_many_lines)]
pub fn validate_summary(candidate_json: &str, competition: &Competition) -> ValidationReport {
    let parsed: Value = match serde_json::from_str(candidate_json) {
        Ok(value) => value,
        Err(err) => {
            return ValidationReport::rejected(format!("could not parse summary JSON: {err}"));
        }
    };

    // Totals are checked for numeric-ness before anything is recomputed.
    let (Some(reported_user_total), Some(reported_challenger_total)) = (
        coerce_finite_number(parsed.get("userTotal")),
        coerce_finite_number(parsed.get("challengerTotal")),
    ) else {
        return ValidationReport::rejected("reported totals are not numbers".to_string());
    };

    // Expected totals come from the in-memory stats, partitioned by exact
    // identity; rows matching neither participant are ignored.
    let mut expected_user_total = 0_i64;
    let mut expected_challenger_total = 0_i64;
    for stat in &competition.daily_stats {
        if stat.user == competition.user {
            expected_user_total += i64::from(stat.daily_score);
        } else if stat.user == competition.challenger {
            expected_challenger_total += i64::from(stat.daily_score);
        }
    }

    let expected_winner = if expected_user_total > expected_challenger_total {
        competition.user.as_str()
    } else if expected_challenger_total > expected_user_total {
        competition.challenger.as_str()
    } else {
        DRAW_MARKER
    };
    let expected_is_draw = expected_winner == DRAW_MARKER;

    let reported_winner_raw = parsed
        .get("winner")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim();
    let reported_winner_norm = reported_winner_raw.to_lowercase();
    let reported_is_draw = DRAW_SYNONYMS.contains(&reported_winner_norm.as_str());

    let reported_is_one_of_expected = reported_is_draw
        || reported_winner_norm == normalize_identity(&competition.user)
        || reported_winner_norm == normalize_identity(&competition.challenger);
    if !reported_is_one_of_expected {
        return ValidationReport {
            valid: false,
            expected_user_total,
            expected_challenger_total,
            message: format!(
                "reported winner \"{reported_winner_raw}\" is not one of [{}, {}, {DRAW_MARKER}]",
                competition.user, competition.challenger
            ),
        };
    }

    let winner_matches = if reported_is_draw {
        expected_is_draw
    } else {
        reported_winner_norm == normalize_identity(expected_winner)
    };

    let totals_match = expected_user_total as f64 == reported_user_total
        && expected_challenger_total as f64 == reported_challenger_total;

    // Date consistency: the summary may not hallucinate days outside the
    // window and must mention every day inside it.
    let mut reported_dates: BTreeSet<Date> = BTreeSet::new();
    if let Some(Value::Array(highlights)) = parsed.get("dailyHighlights") {
        for entry in highlights {
            if let Value::String(text) = entry {
                if let Some(date) = first_iso_date(text) {
                    reported_dates.insert(date);
                }
            }
        }
    }

    let out_of_range: Vec<String> = reported_dates
        .iter()
        .filter(|date| !competition.covers(**date))
        .map(|date| format_iso_date(*date))
        .collect();
    let missing: Vec<String> = date_range(competition.start_date, competition.end_date)
        .into_iter()
        .filter(|date| !reported_dates.contains(date))
        .map(format_iso_date)
        .collect();

    let range_label = format!(
        "{}..{}",
        format_iso_date(competition.start_date),
        format_iso_date(competition.end_date)
    );

    let mut errors = Vec::new();
    if !out_of_range.is_empty() {
        errors.push(format!(
            "date out of range: summary reported dates outside {range_label}: {out_of_range:?}"
        ));
    }
    if !missing.is_empty() {
        errors.push(format!(
            "missing dates: summary did not include these dates from {range_label}: {missing:?}"
        ));
    }
    if !totals_match {
        errors.push(format!(
            "expected totals {expected_user_total}/{expected_challenger_total} but summary reported {reported_user_total}/{reported_challenger_total}"
        ));
    }
    if !winner_matches {
        errors.push(format!(
            "expected winner \"{expected_winner}\" but summary reported \"{reported_winner_raw}\""
        ));
    }

    let valid = errors.is_empty();
    let message = if valid {
        "totals, winner, and dates match".to_string()
    } else {
        errors.join("; ")
    };

    ValidationReport {
        valid,
        expected_user_total,
        expected_challenger_total,
        message,
    }
}

fn normalize_identity(name: &str) -> String {
    name.trim().to_lowercase()
}

fn coerce_finite_number(value: Option<&Value>) -> Option<f64> {
    match value {
        Some(Value::Number(number)) => number.as_f64().filter(|n| n.is_finite()),
        Some(Value::String(raw)) => raw.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

fn first_iso_date(text: &str) -> Option<Date> {
    let bytes = text.as_bytes();
    for start in 0..bytes.len().saturating_sub(9) {
        if looks_like_iso_date(&bytes[start..start + 10]) {
            if let Some(token) = text.get(start..start + 10) {
                if let Ok(date) = parse_iso_date(token) {
                    return Some(date);
                }
            }
        }
    }
    None
}

fn looks_like_iso_date(window: &[u8]) -> bool {
    window.len() == 10
        && window.iter().enumerate().all(|(index, byte)| match index {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        })
}

/// Typed view of an accepted summary, using the exact field names the model
/// is instructed to produce.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionSummary {
    pub summary_title: String,
    pub winner: String,
    pub user_total: f64,
    pub challenger_total: f64,
    pub daily_highlights: Vec<String>,
    pub motivation: String,
}

impl CompetitionSummary {
    /// Deterministic summary computed straight from the canonical stats.
    /// Always passes [`validate_summary`]; used by the mock client and tests.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn faithful(competition: &Competition) -> Self {
        let mut user_total = 0_i64;
        let mut challenger_total = 0_i64;
        for stat in &competition.daily_stats {
            if stat.user == competition.user {
                user_total += i64::from(stat.daily_score);
            } else if stat.user == competition.challenger {
                challenger_total += i64::from(stat.daily_score);
            }
        }

        let winner = if user_total > challenger_total {
            competition.user.clone()
        } else if challenger_total > user_total {
            competition.challenger.clone()
        } else {
            DRAW_MARKER.to_string()
        };

        let daily_highlights = date_range(competition.start_date, competition.end_date)
            .into_iter()
            .enumerate()
            .map(|(index, date)| {
                let day = index + 1;
                let user_part = describe_day(competition, &competition.user, date);
                let challenger_part = describe_day(competition, &competition.challenger, date);
                format!(
                    "Day {day} ({}): {user_part}; {challenger_part}",
                    format_iso_date(date)
                )
            })
            .collect();

        Self {
            summary_title: format!(
                "{} vs {} Weekly Competition Summary",
                competition.user, competition.challenger
            ),
            winner,
            user_total: user_total as f64,
            challenger_total: challenger_total as f64,
            daily_highlights,
            motivation: format!(
                "Both {} and {} logged real progress this round; keep reporting every day and the streaks will follow.",
                competition.user, competition.challenger
            ),
        }
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut lines = vec![
            self.summary_title.clone(),
            "-".repeat(36),
            format!("Winner: {}", self.winner),
            format!("Scores: {} vs {}", self.user_total, self.challenger_total),
            String::new(),
            "Daily highlights:".to_string(),
        ];
        for highlight in &self.daily_highlights {
            lines.push(format!("- {highlight}"));
        }
        lines.push(String::new());
        lines.push(format!("Motivation: {}", self.motivation));
        lines.join("\n")
    }
}

fn describe_day(competition: &Competition, participant: &str, date: Date) -> String {
    let stat = competition
        .daily_stats
        .iter()
        .find(|stat| stat.user == participant && stat.date == date);
    match stat {
        None => format!("{participant} did not report data"),
        Some(stat) => format!(
            "{participant} {} and {} (score {})",
            flag_phrase(stat.bedtime_success, "bedtime"),
            flag_phrase(stat.wake_up_success, "wake-up"),
            stat.daily_score
        ),
    }
}

fn flag_phrase(flag: Option<bool>, label: &str) -> String {
    match flag {
        Some(true) => format!("hit {label}"),
        Some(false) => format!("missed {label}"),
        None => format!("did not report {label}"),
    }
}

/// One deterministic JSON line per stat, exactly as disclosed to the model.
/// The validator later recomputes against the same records, so the prompt
/// must not reshape or omit fields.
#[must_use]
pub fn stat_json_line(stat: &DailyStat) -> String {
    serde_json::json!({
        "user": stat.user,
        "date": format_iso_date(stat.date),
        "bedtimeSuccess": stat.bedtime_success,
        "wakeUpSuccess": stat.wake_up_success,
        "dailyScore": stat.daily_score,
    })
    .to_string()
}

#[must_use]
pub fn build_summary_prompt(competition: &Competition) -> String {
    let stat_lines = competition
        .daily_stats
        .iter()
        .map(stat_json_line)
        .collect::<Vec<_>>()
        .join("\n");
    let start = format_iso_date(competition.start_date);
    let end = format_iso_date(competition.end_date);
    let user = &competition.user;
    let challenger = &competition.challenger;

    format!(
        r#"Competition participants: {user} (user) and {challenger} (challenger)

Input stats (one JSON object per line, date format YYYY-MM-DD):
{stat_lines}

Instructions (must follow exactly):
1) Parse each line as JSON. Ignore lines that are not valid JSON.
2) Sort all parsed entries strictly in ascending order by "date".
3) Only include dates between {start} and {end} (inclusive).
   - Do NOT fabricate or infer any days outside this range.
   - If an input line contains an out-of-range date, ignore it completely.
4) Compute "userTotal" and "challengerTotal" by summing all "dailyScore" values for each participant.
   - Be explicit: add positive scores and subtract negative ones exactly as written in each parsed JSON.
   - Verify that these totals are correct and consistent with the per-day highlights.
5) Build "dailyHighlights" in chronological order, ensuring one entry for every date from start to end.
6) For each date:
   - If both users have entries, summarize both results (e.g., "{user} hit bedtime while {challenger} missed wake-up").
   - If only one user has data, describe that user's result and clearly state that the other did not report data.
   - If neither user has any entry, explicitly note that both participants did not report data.
   - DO NOT ASSUME MISSING DATA IS A MISSED TARGET. Only report what is explicitly given.
   - Do not decrease {challenger}'s or {user}'s score for days they did not report data.
7) Continue numbering days sequentially (Day 1, Day 2, ...) regardless of missing data.
8) Determine the winner:
   - If userTotal > challengerTotal -> winner = {user}
   - If challengerTotal > userTotal -> winner = {challenger}
   - If totals tie -> winner = "Draw"
   - If totals and winner disagree, correct the inconsistency by adjusting the winner to match the totals.
9) Motivation message (one to three sentences):
   - Must reflect both scoring and participation.
   - If one user missed multiple days but scored higher, emphasize their perseverance while encouraging steadier reporting.
   - If both missed days, focus on teamwork and mutual accountability.
   - If totals tie but participation differs, celebrate the participant who stayed consistent while motivating the other to log daily.
   - Keep tone constructive, specific, and directly grounded in the highlights; avoid generic praise or scolding.
10) Return VALID JSON ONLY in the exact format below. No explanations, no markdown, no extra text.

Required JSON schema:
{{
  "summaryTitle": "{user} vs {challenger} Weekly Competition Summary",
  "winner": "<NAME if userTotal != challengerTotal otherwise Draw>",
  "userTotal": <number>,
  "challengerTotal": <number>,
  "dailyHighlights": ["Day 1 (YYYY-MM-DD): ...", "Day 2 (YYYY-MM-DD): ..."],
  "motivation": "<one to three sentence motivational message>"
}}
"#
    )
}

/// First `{{` through last `}}` of a raw model response. Models often wrap
/// JSON in prose or markdown fences; everything outside the outermost braces
/// is discarded.
#[must_use]
pub fn extract_json_block(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    text.get(start..=end)
}

const ISO_DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parses a calendar date in ISO `YYYY-MM-DD` form.
///
/// # Errors
/// Returns [`RivalError::Validation`] when parsing fails.
pub fn parse_iso_date(value: &str) -> Result<Date, RivalError> {
    Date::parse(value, ISO_DATE_FORMAT)
        .map_err(|err| RivalError::Validation(format!("invalid ISO date '{value}': {err}")))
}

#[must_use]
pub fn format_iso_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Inclusive calendar sequence from `start` to `end`; empty when reversed.
#[must_use]
pub fn date_range(start: Date, end: Date) -> Vec<Date> {
    let mut dates = Vec::new();
    let mut current = start;
    while current <= end {
        dates.push(current);
        match current.next_day() {
            Some(next) => current = next,
            None => break,
        }
    }
    dates
}

pub mod iso_date {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    /// # Errors
    /// Propagates serializer failures.
    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_iso_date(*date))
    }

    /// # Errors
    /// Fails when the value is not a `YYYY-MM-DD` string.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_iso_date(&raw).map_err(serde::de::Error::custom)
    }
}
