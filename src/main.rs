use clap::{Parser, ValueEnum};
use rankplan::search::heuristics::{H1Heuristic, ZeroHeuristic};
use rankplan::search::search_engines::{
    BreadthFirstSearch, EagerAStarSearch, SearchName, SearchResult,
};
use rankplan::search::successor_generators::{AnySuccessorGenerator, SuccessorGeneratorName};
use rankplan::search::translate::translate;
use rankplan::search::{Problem, StateSpace};
use std::path::PathBuf;
use std::process::exit;
use std::rc::Rc;
use std::time::Instant;

const STATE_SPACE_LIMIT: usize = 100_000;

#[derive(Parser)]
#[command(version)]
/// A STRIPS planner over bitset states.
struct Args {
    #[arg(help = "The PDDL domain file")]
    domain: PathBuf,
    #[arg(help = "The PDDL problem instance file")]
    problem: PathBuf,
    #[arg(help = "The successor generator: lifted, grounded or automatic")]
    generator: String,
    #[arg(help = "The search algorithm: bfs, astar, dijkstras or statespace")]
    search: String,
}

fn resident_kilobytes() -> usize {
    memory_stats::memory_stats()
        .map(|usage| usage.physical_mem / 1000)
        .unwrap_or(0)
}

fn print_search_result(result: &SearchResult) {
    println!();
    match result {
        SearchResult::Solved(plan) => {
            println!("Found a plan of length {}:", plan.len());
            print!("{plan}");
        }
        SearchResult::Unsolvable => println!("Problem is provably unsolvable"),
        SearchResult::Aborted => println!("Search was aborted"),
    }
}

fn bfs(problem: Rc<Problem>, successor_generator: &AnySuccessorGenerator) {
    let mut search = BreadthFirstSearch::new(problem, successor_generator);
    let time_start = Instant::now();

    search.register_handler(Box::new(move |statistics| {
        println!(
            "[depth = {}] Expanded: {}; Generated: {} [{} ms; {} KB]",
            statistics.max_depth,
            statistics.expanded,
            statistics.generated,
            time_start.elapsed().as_millis(),
            resident_kilobytes()
        );
    }));

    print_search_result(&search.plan());
}

fn astar(problem: Rc<Problem>, successor_generator: &AnySuccessorGenerator) {
    let Some(grounded) = successor_generator.as_grounded() else {
        println!("Error: astar requires a grounded successor generator");
        exit(7);
    };
    let heuristic = Box::new(H1Heuristic::new(Rc::clone(&problem), grounded));
    let mut search = EagerAStarSearch::new(problem, successor_generator, heuristic);
    let time_start = Instant::now();

    search.register_handler(Box::new(move |statistics| {
        println!(
            "[f = {}] Expanded: {}; Generated: {}; Evaluated: {} [{} ms; {} KB]",
            statistics.max_f_value,
            statistics.expanded,
            statistics.generated,
            statistics.evaluated,
            time_start.elapsed().as_millis(),
            resident_kilobytes()
        );
    }));

    print_search_result(&search.plan());
}

fn dijkstras(problem: Rc<Problem>, successor_generator: &AnySuccessorGenerator) {
    let mut search = EagerAStarSearch::new(
        problem,
        successor_generator,
        Box::new(ZeroHeuristic::new()),
    );
    let time_start = Instant::now();

    search.register_handler(Box::new(move |statistics| {
        println!(
            "[f = {}] Expanded: {}; Generated: {} [{} ms; {} KB]",
            statistics.max_f_value,
            statistics.expanded,
            statistics.generated,
            time_start.elapsed().as_millis(),
            resident_kilobytes()
        );
    }));

    print_search_result(&search.plan());
}

fn state_space(problem: Rc<Problem>, successor_generator: &AnySuccessorGenerator) {
    match StateSpace::new(Rc::clone(&problem), successor_generator, STATE_SPACE_LIMIT) {
        Some(space) => {
            println!("# Objects: {}", problem.num_objects());
            println!("# States: {}", space.num_states());
            println!("# Dead End States: {}", space.num_dead_end_states());
            println!("# Goal States: {}", space.num_goal_states());
        }
        None => println!("Problem too large to expand"),
    }
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(error) => {
            eprintln!("{error}");
            exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .compact()
        .init();

    if !args.domain.exists() {
        println!("Error: \"domain\" does not exist");
        exit(2);
    }
    if !args.problem.exists() {
        println!("Error: \"problem\" does not exist");
        exit(3);
    }
    let Ok(generator_name) = SuccessorGeneratorName::from_str(&args.generator, true) else {
        println!("Error: \"successor_generator\" does not exist");
        exit(4);
    };
    let Ok(search_name) = SearchName::from_str(&args.search, true) else {
        println!("Error: \"search\" does not exist");
        exit(5);
    };

    let domain_text = std::fs::read_to_string(&args.domain).unwrap_or_else(|error| {
        eprintln!("Error: failed to read the domain file: {error}");
        exit(2);
    });
    let problem_text = std::fs::read_to_string(&args.problem).unwrap_or_else(|error| {
        eprintln!("Error: failed to read the problem file: {error}");
        exit(3);
    });

    let problem = match translate(&domain_text, &problem_text) {
        Ok(problem) => problem,
        Err(error) => {
            eprintln!("Error: {error}");
            exit(6);
        }
    };

    let successor_generator = generator_name.create(Rc::clone(&problem));

    match search_name {
        SearchName::Bfs => bfs(problem, &successor_generator),
        SearchName::Astar => astar(problem, &successor_generator),
        SearchName::Dijkstras => dijkstras(problem, &successor_generator),
        SearchName::Statespace => state_space(problem, &successor_generator),
    }
}
