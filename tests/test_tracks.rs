//! Look up storms in saved HURDAT2 and IBTrACS excerpts.
use metfor::{HectoPascal, Knots};
use wx_viewer::{
    render::{map_bounds, map_title, unwrap_longitudes},
    tracks::{Basin, BasinSelection, SaffirSimpson, TrackArchive, TrackDataset, TrackSource},
    Error,
};

mod utils;
use crate::utils::*;

fn load(option: i64) -> TrackDataset {
    let selection = BasinSelection::from_option(option).unwrap();
    FixtureArchive::new().load(selection).unwrap()
}

#[test]
fn test_hurdat_dataset() {
    let dataset = load(0);

    assert_eq!(
        dataset.selection(),
        BasinSelection {
            basin: Basin::NorthAtlantic,
            source: TrackSource::Hurdat
        }
    );
    assert_eq!(dataset.storms().len(), 4);
}

#[test]
fn test_katrina() {
    let dataset = load(0);
    let katrina = dataset.get_storm("katrina", 2005).unwrap();

    assert_eq!(katrina.id, "AL122005");
    assert_eq!(katrina.points.len(), 12);
    assert_eq!(katrina.max_wind(), Some(Knots(150.0)));
    assert_eq!(katrina.min_pressure(), Some(HectoPascal(902.0)));
    assert_eq!(katrina.peak_category(), Some(SaffirSimpson::Category5));
    assert_eq!(katrina.points.iter().filter(|pnt| pnt.landfall).count(), 3);

    // Only the synoptic times at tropical storm strength or more count.
    assert!(approx_equal(katrina.ace(), 5.185, 1.0e-9));

    let (title, subtitle) = map_title(katrina);
    assert_eq!(title, "KATRINA (2005)");
    assert!(subtitle.contains("150 kt"));
    assert!(subtitle.contains("902 hPa"));
    assert!(subtitle.contains("(C5)"));
}

#[test]
fn test_storm_lookup_errors() {
    let dataset = load(0);

    match dataset.get_storm("Unnamed", 1951) {
        Err(Error::AmbiguousStorm { year, ids, .. }) => {
            assert_eq!(year, 1951);
            assert_eq!(ids, vec!["AL011951".to_owned(), "AL021951".to_owned()]);
        }
        other => panic!("expected AmbiguousStorm, got {:?}", other),
    }

    assert!(matches!(
        dataset.get_storm("Irene", 2005),
        Err(Error::StormNotFound { year: 2005, .. })
    ));
    assert!(dataset.get_storm("  IRENE ", 2011).is_ok());
}

#[test]
fn test_haiyan_from_ibtracs() {
    let dataset = load(3);
    assert_eq!(dataset.selection().basin, Basin::WestPacific);
    assert_eq!(dataset.selection().source, TrackSource::Ibtracs);
    assert_eq!(dataset.storms().len(), 2);

    let haiyan = dataset.get_storm("Haiyan", 2013).unwrap();
    assert_eq!(haiyan.id, "2013306N07162");
    assert_eq!(haiyan.points.len(), 6);
    assert_eq!(haiyan.max_wind(), Some(Knots(165.0)));
    assert_eq!(haiyan.min_pressure(), Some(HectoPascal(895.0)));
    assert_eq!(haiyan.peak_category(), Some(SaffirSimpson::Category5));
    assert_eq!(haiyan.points.iter().filter(|pnt| pnt.landfall).count(), 1);

    let last = haiyan.points.last().unwrap();
    assert_eq!(last.status, "ET");
    assert!(!last.is_tropical());
    assert_eq!(last.vmax.into_option(), Some(Knots(35.0)));
}

#[test]
fn test_track_across_the_dateline() {
    let dataset = load(3);
    let chan_hom = dataset.get_storm("CHAN-HOM", 2015).unwrap();

    let lons: Vec<f64> = chan_hom.points.iter().map(|pnt| pnt.lon).collect();
    let lats: Vec<f64> = chan_hom.points.iter().map(|pnt| pnt.lat).collect();
    let unwrapped = unwrap_longitudes(&lons);

    assert_eq!(unwrapped[0], 158.0);
    assert_eq!(unwrapped[1], 179.5);
    assert!(approx_equal(unwrapped[2], 181.2, 1.0e-9));

    let ((lon_lo, lon_hi), (lat_lo, lat_hi)) = map_bounds(&unwrapped, &lats);
    assert_eq!((lon_lo, lon_hi), (150.0, 190.0));
    assert_eq!((lat_lo, lat_hi), (5.0, 20.0));
}
