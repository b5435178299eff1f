//! Headless editing of a stored map file. Structural commands (maps, empty routes) talk to
//! the store directly; waypoint commands drive the same facade flows a GUI host would, just
//! against a surface that draws nothing.

#[macro_use]
extern crate log;

use anyhow::{bail, Context, Result};
use structopt::StructOpt;

use geom::LonLat;
use map_pane::{ContextTarget, FixedLocator, HeadlessRenderer, MapPane};
use route_model::{map_to_geojson, routes_from_geojson, MapStore, PolylineStyle, Route};

#[derive(StructOpt)]
#[structopt(name = "waymap", about = "Edit stored route maps without a GUI")]
struct Args {
    /// The store file holding every map
    #[structopt(long, default_value = "maps.json")]
    store: String,
    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt)]
enum Command {
    /// Prints every map in the store, with each route's stats
    Show,
    /// Creates a map and selects it
    CreateMap {
        /// A name unique within the store
        name: String,
    },
    /// Selects the map that later commands work against
    SelectMap {
        name: String,
    },
    /// Deletes a map and everything on it
    DeleteMap {
        name: String,
    },
    /// Creates an empty route on the selected map
    CreateRoute {
        /// A name unique within the map
        name: String,
    },
    /// Appends a waypoint to a route on the selected map, connecting it to the previous one
    AddWaypoint {
        /// The route to extend; it's created if it doesn't exist yet
        #[structopt(long)]
        route: String,
        /// Longitude of the new waypoint
        lon: f64,
        /// Latitude of the new waypoint
        lat: f64,
        /// Stroke color for the connecting line, if not the default
        #[structopt(long)]
        color: Option<String>,
    },
    /// Deletes the waypoint at a position, repairing the route around the gap
    DeleteWaypoint {
        #[structopt(long)]
        route: String,
        lon: f64,
        lat: f64,
    },
    /// Removes all waypoints and lines from a route
    ClearRoute {
        name: String,
    },
    /// Writes the selected map's routes as GeoJSON to STDOUT
    ExportGeojson,
    /// Reads a GeoJSON feature collection and adds its LineStrings as routes
    ImportGeojson {
        /// The path to a GeoJSON file
        path: String,
    },
}

fn main() -> Result<()> {
    maputil::logger::setup();
    let args = Args::from_args();
    match args.command {
        Command::Show => show(&args.store),
        Command::CreateMap { name } => create_map(&args.store, &name),
        Command::SelectMap { name } => select_map(&args.store, &name),
        Command::DeleteMap { name } => delete_map(&args.store, &name),
        Command::CreateRoute { name } => create_route(&args.store, &name),
        Command::AddWaypoint {
            route,
            lon,
            lat,
            color,
        } => add_waypoint(&args.store, &route, LonLat::new(lon, lat), color),
        Command::DeleteWaypoint { route, lon, lat } => {
            delete_waypoint(&args.store, &route, LonLat::new(lon, lat))
        }
        Command::ClearRoute { name } => clear_route(&args.store, &name),
        Command::ExportGeojson => export_geojson(&args.store),
        Command::ImportGeojson { path } => import_geojson(&args.store, &path),
    }
}

// Somewhere to point the map at startup when no geolocation provider is wired up.
const DEFAULT_CENTER: LonLat = LonLat {
    longitude: -122.3321,
    latitude: 47.6062,
};

fn open_pane(store: &str) -> MapPane<HeadlessRenderer> {
    let mut pane = MapPane::new(
        HeadlessRenderer::new(),
        Box::new(FixedLocator(DEFAULT_CENTER)),
        store,
    );
    pane.initialize();
    pane.map_ready();
    pane
}

fn show(store: &str) -> Result<()> {
    let store = MapStore::load(store)?;
    for name in store.map_names() {
        let map = store.get_map(name).unwrap();
        let selected = if store.selected_map_name() == Some(name) {
            " (selected)"
        } else {
            ""
        };
        println!("{}{}", name, selected);
        for route in map.routes() {
            println!(
                "  {}: {} waypoints, {} lines, {}",
                route.name(),
                route.len(),
                route.lines().len(),
                route.length()
            );
            if !route.is_empty() {
                let positions: Vec<LonLat> =
                    route.waypoints().iter().map(|wp| wp.position()).collect();
                println!("    centered on {}", LonLat::center(&positions));
            }
        }
    }
    Ok(())
}

fn create_map(store: &str, name: &str) -> Result<()> {
    let mut store = MapStore::load(store)?;
    store.add_map(name);
    store.select_map(name);
    store.store()?;
    println!("Created and selected {}", name);
    Ok(())
}

fn select_map(store: &str, name: &str) -> Result<()> {
    let mut store = MapStore::load(store)?;
    if !store.select_map(name) {
        bail!("No map named {}", name);
    }
    store.store()?;
    Ok(())
}

fn delete_map(store: &str, name: &str) -> Result<()> {
    let mut store = MapStore::load(store)?;
    if store.delete_map(name).is_none() {
        bail!("No map named {}", name);
    }
    store.store()?;
    println!("Deleted {}", name);
    Ok(())
}

fn create_route(store: &str, name: &str) -> Result<()> {
    let mut store = MapStore::load(store)?;
    let map = store
        .selected_map_mut()
        .context("No map selected; run create-map first")?;
    if !map.add_route(Route::new(name)) {
        bail!("The map already has a route named {}", name);
    }
    store.store()?;
    Ok(())
}

fn add_waypoint(store: &str, route: &str, position: LonLat, color: Option<String>) -> Result<()> {
    let mut pane = open_pane(store);
    if pane.store().selected_map_name().is_none() {
        bail!("No map selected; run create-map first");
    }
    if pane.get_route(route).is_none() {
        pane.add_route(Route::new(route));
    }
    pane.select_route(route);

    let style = color.map(|stroke_color| PolylineStyle {
        stroke_color,
        ..PolylineStyle::default()
    });
    let waypoint = pane.create_waypoint(position);
    pane.add_new_waypoint(waypoint, style);

    let route = pane.get_route(route).unwrap();
    println!(
        "{} now has {} waypoints over {}",
        route.name(),
        route.len(),
        route.length()
    );
    Ok(())
}

fn delete_waypoint(store: &str, route: &str, position: LonLat) -> Result<()> {
    let mut pane = open_pane(store);
    let found = pane
        .get_route(route)
        .with_context(|| format!("No route named {}", route))?
        .waypoints()
        .iter()
        .any(|wp| wp.position() == position);
    if !found {
        bail!("{} has no waypoint at {}", route, position);
    }

    pane.delete_object(&ContextTarget::Waypoint {
        route: route.to_string(),
        position,
    });
    let route = pane.get_route(route).unwrap();
    println!(
        "{} now has {} waypoints and {} lines",
        route.name(),
        route.len(),
        route.lines().len()
    );
    Ok(())
}

fn clear_route(store: &str, name: &str) -> Result<()> {
    let mut pane = open_pane(store);
    if pane.get_route(name).is_none() {
        bail!("No route named {}", name);
    }
    pane.clear_route(name);
    Ok(())
}

fn export_geojson(store: &str) -> Result<()> {
    let store = MapStore::load(store)?;
    let map = store.selected_map().context("No map selected")?;
    println!("{}", map_to_geojson(map));
    Ok(())
}

fn import_geojson(store: &str, path: &str) -> Result<()> {
    let mut store = MapStore::load(store)?;
    let raw = fs_err::read_to_string(path)?;
    let routes = routes_from_geojson(&raw, &PolylineStyle::default())?;
    let map = store
        .selected_map_mut()
        .context("No map selected; run create-map first")?;
    let mut added = 0;
    for route in routes {
        let name = route.name().to_string();
        if map.add_route(route) {
            added += 1;
        } else {
            warn!("Skipping {}; the map already has a route by that name", name);
        }
    }
    store.store()?;
    info!("Imported {} routes from {}", added, path);
    Ok(())
}
