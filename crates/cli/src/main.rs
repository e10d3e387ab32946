//! Growth CLI - goal progress from the command line.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use growth_core::{
    Goal, GoalId, GoalProgressBreakdown, Habit, HabitFrequency, HabitId, Metric, MetricDirection,
    MetricId, SuccessCriterion, Task, TaskId, TaskStatus,
};
use growth_progress::{BasicProgressTracker, GoalProgressEngine, ProgressConfig, ProgressTracker};
use growth_storage::{JsonStorage, Storage};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "growth")]
#[command(about = "Goal progress tracking", long_about = None)]
struct Cli {
    /// Data directory
    #[arg(long, global = true, default_value = ".growth")]
    data_dir: PathBuf,

    /// Progress configuration file (JSON); defaults to <data-dir>/config.json
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the progress breakdown for a goal
    Progress {
        /// Goal ID
        id: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List goals with their overall progress
    Goals,
    /// Print every goal's breakdown as JSON
    Snapshot,
    /// Add a goal
    AddGoal {
        /// Goal title
        title: String,
        /// Success criterion (repeatable)
        #[arg(long = "criterion")]
        criteria: Vec<String>,
        /// Parent goal ID
        #[arg(long)]
        parent: Option<String>,
    },
    /// Mark a success criterion (1-based index) as met
    Check {
        /// Goal ID
        goal: String,
        /// Criterion number as listed by `progress`
        index: usize,
    },
    /// Add a task
    AddTask {
        /// Task title
        title: String,
        /// Linked goal ID
        #[arg(long)]
        goal: Option<String>,
    },
    /// Change a task's status
    SetTask {
        /// Task ID
        id: String,
        /// New status (not-started, in-progress, completed, blocked, cancelled)
        status: String,
    },
    /// Add a metric
    AddMetric {
        /// Metric name
        name: String,
        /// Current value
        #[arg(long, default_value = "0")]
        current: f64,
        /// Target value
        #[arg(long)]
        target: f64,
        /// higher or lower
        #[arg(long, default_value = "higher")]
        direction: String,
        /// Unit label
        #[arg(long)]
        unit: Option<String>,
        /// Linked goal ID
        #[arg(long)]
        goal: Option<String>,
    },
    /// Record a new metric value
    SetMetric {
        /// Metric ID
        id: String,
        /// New current value
        value: f64,
    },
    /// Add a habit
    AddHabit {
        /// Habit name
        name: String,
        /// Times per week; daily when omitted
        #[arg(long)]
        weekly: Option<u32>,
        /// Linked goal ID
        #[arg(long)]
        goal: Option<String>,
    },
    /// Log a habit completion
    LogHabit {
        /// Habit ID
        id: String,
        /// Day to log (YYYY-MM-DD), today by default
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref(), &cli.data_dir).await?;
    let mut storage = JsonStorage::new(&cli.data_dir).await?;

    match cli.command {
        Commands::Progress { id, json } => {
            let goal_id = parse_id::<GoalId>(&id, "goal")?;
            let tracker = tracker(&storage, config);
            let Some(goal) = storage.load_goal(goal_id).await? else {
                println!("Goal not found");
                return Ok(());
            };
            let progress = tracker.progress_for(&goal).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&progress)?);
            } else {
                print_breakdown(&goal, &progress);
            }
        }
        Commands::Goals => {
            let tracker = tracker(&storage, config);
            let goals = storage.list_goals().await?;

            println!("Goals ({})", goals.len());
            for goal in goals {
                let progress = tracker.progress_for(&goal).await;
                println!("  {} | {:>3}% | {}", goal.id, progress.overall, goal.title);
            }
        }
        Commands::Snapshot => {
            let snapshot = tracker(&storage, config).snapshot().await?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Commands::AddGoal { title, criteria, parent } => {
            let mut goal = Goal::new(title);
            for description in criteria {
                goal = goal.with_criterion(SuccessCriterion::new(description));
            }
            if let Some(parent) = parent {
                let parent_id = parse_id::<GoalId>(&parent, "goal")?;
                if storage.load_goal(parent_id).await?.is_none() {
                    anyhow::bail!("Parent goal {} not found", parent_id);
                }
                goal = goal.with_parent(parent_id);
            }
            storage.save_goal(&goal).await?;
            println!("Added goal: {} - {}", goal.id, goal.title);
        }
        Commands::Check { goal, index } => {
            let goal_id = parse_id::<GoalId>(&goal, "goal")?;
            let mut goal = storage
                .load_goal(goal_id)
                .await?
                .with_context(|| format!("Goal {} not found", goal_id))?;
            let criterion = index
                .checked_sub(1)
                .and_then(|i| goal.success_criteria.get_mut(i))
                .with_context(|| format!("Goal has no criterion #{}", index))?;
            criterion.is_completed = true;
            let description = criterion.description.clone();
            goal.updated_at = Utc::now();
            storage.save_goal(&goal).await?;
            println!("Checked: {}", description);
        }
        Commands::AddTask { title, goal } => {
            let mut task = Task::new(title);
            if let Some(goal) = goal {
                task = task.for_goal(parse_id::<GoalId>(&goal, "goal")?);
            }
            storage.save_task(&task).await?;
            println!("Added task: {} - {}", task.id, task.title);
        }
        Commands::SetTask { id, status } => {
            let task_id = parse_id::<TaskId>(&id, "task")?;
            let status: TaskStatus = status.parse()?;
            let mut task = storage
                .load_task(task_id)
                .await?
                .with_context(|| format!("Task {} not found", task_id))?;
            task.status = status;
            task.updated_at = Utc::now();
            storage.save_task(&task).await?;
            println!("Task {} is now {}", task.id, task.status);
        }
        Commands::AddMetric { name, current, target, direction, unit, goal } => {
            let direction: MetricDirection = direction.parse()?;
            let mut metric = Metric::new(name, current, target).with_direction(direction);
            metric.unit = unit;
            if let Some(goal) = goal {
                metric = metric.for_goal(parse_id::<GoalId>(&goal, "goal")?);
            }
            storage.save_metric(&metric).await?;
            println!("Added metric: {} - {}", metric.id, metric.name);
        }
        Commands::SetMetric { id, value } => {
            let metric_id = parse_id::<MetricId>(&id, "metric")?;
            let mut metric = storage
                .load_metric(metric_id)
                .await?
                .with_context(|| format!("Metric {} not found", metric_id))?;
            metric.current_value = Some(value);
            metric.updated_at = Utc::now();
            storage.save_metric(&metric).await?;
            let state = if metric.is_at_target() { "at target" } else { "below target" };
            println!("{}: {} ({})", metric.name, value, state);
        }
        Commands::AddHabit { name, weekly, goal } => {
            let mut habit = Habit::new(name).starting(Utc::now().date_naive());
            if let Some(times_per_week) = weekly {
                habit = habit.with_frequency(HabitFrequency::Weekly { times_per_week });
            }
            if let Some(goal) = goal {
                habit = habit.for_goal(parse_id::<GoalId>(&goal, "goal")?);
            }
            storage.save_habit(&habit).await?;
            println!("Added habit: {} - {}", habit.id, habit.name);
        }
        Commands::LogHabit { id, date } => {
            let habit_id = parse_id::<HabitId>(&id, "habit")?;
            let mut habit = storage
                .load_habit(habit_id)
                .await?
                .with_context(|| format!("Habit {} not found", habit_id))?;
            let date = date.unwrap_or_else(|| Utc::now().date_naive());
            habit.log(date);
            storage.save_habit(&habit).await?;
            info!("Logged habit {} on {}", habit.id, date);
            println!("Logged {} on {}", habit.name, date);
        }
    }

    Ok(())
}

fn tracker(storage: &JsonStorage, config: ProgressConfig) -> BasicProgressTracker<JsonStorage> {
    BasicProgressTracker::new(storage.clone())
        .with_engine(GoalProgressEngine::new().with_config(config))
}

async fn load_config(explicit: Option<&Path>, data_dir: &Path) -> Result<ProgressConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default = data_dir.join("config.json");
            if !tokio::fs::try_exists(&default).await.unwrap_or(false) {
                debug!("No config file, using defaults");
                return Ok(ProgressConfig::default());
            }
            default
        }
    };

    let text = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: ProgressConfig = serde_json::from_str(&text)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config {}", path.display()))?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

fn parse_id<T: std::str::FromStr>(s: &str, kind: &str) -> Result<T> {
    s.parse().map_err(|_| anyhow::anyhow!("Invalid {} ID: {}", kind, s))
}

fn print_breakdown(goal: &Goal, progress: &GoalProgressBreakdown) {
    println!("Goal: {}", goal.title);
    println!("  Overall: {}%", progress.overall);
    if progress.fallback {
        println!("  (linked items unavailable, showing criteria only)");
    }

    println!(
        "  Criteria: {}/{} ({}%)",
        progress.criteria.completed, progress.criteria.total, progress.criteria.percentage
    );
    for (i, criterion) in goal.success_criteria.iter().enumerate() {
        let mark = if criterion.is_completed { "x" } else { " " };
        println!("    {}. [{}] {}", i + 1, mark, criterion.description);
    }
    println!(
        "  Tasks: {}/{} ({}%)",
        progress.tasks.completed, progress.tasks.total, progress.tasks.percentage
    );
    println!(
        "  Metrics: {}/{} at target ({}%)",
        progress.metrics.at_target, progress.metrics.total, progress.metrics.percentage
    );
    println!(
        "  Habits: {} linked, best streak {} days, {}% consistent (score {}%)",
        progress.habits.total,
        progress.habits.streak_days,
        progress.habits.consistency,
        progress.habits.score
    );
}
