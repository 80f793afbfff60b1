//! Parse a saved University of Wyoming page and analyze it.
use metfor::{HectoPascal, Quantity};
use wx_viewer::{
    parcel_trajectory, surface_parcel, wyoming::parse_response, Analysis, Error, UpperAirSource,
};

mod utils;
use crate::utils::*;

#[test]
fn test_levels_without_data_are_dropped() {
    let snd = oun_sounding();

    // The 1000 hPa row has only a height, it is below ground.
    assert_eq!(snd.len(), 21);
    assert_eq!(snd.bottom_pressure(), Some(HectoPascal(965.0)));

    let top = snd.data_row(snd.len() - 1).unwrap();
    assert_eq!(top.pressure.into_option(), Some(HectoPascal(100.0)));
    assert_eq!(top.height.unwrap().unpack(), 16434.0);
}

#[test]
fn test_station_and_valid_time() {
    let snd = oun_sounding();
    let stn = snd.station_info();

    assert_eq!(stn.station_id(), Some("OUN"));
    assert_eq!(stn.station_num().into_option(), Some(72357));
    assert_eq!(stn.location(), Some((35.18, -97.44)));
    assert_eq!(stn.elevation().unwrap().unpack(), 357.0);

    assert_eq!(snd.valid_time(), Some(oun_valid_time()));
    assert_eq!(snd.source_description(), Some("University of Wyoming"));
}

#[test]
fn test_surface_row() {
    let snd = oun_sounding();
    let sfc = snd.data_row(0).unwrap();

    assert_eq!(sfc.temperature.unwrap().unpack(), 26.4);
    assert_eq!(sfc.dew_point.unwrap().unpack(), 17.4);

    let wind = sfc.wind.unwrap();
    assert_eq!(wind.direction, 160.0);
    assert_eq!(wind.speed.unpack(), 12.0);
}

#[test]
fn test_missing_sounding_page() {
    let page = "<HTML>Can't get 72357 OUN Norman Observations at 00Z 31 Feb 2013.</HTML>";

    match parse_response(page, "OUN", oun_valid_time()) {
        Err(Error::NoSounding { station, time }) => {
            assert_eq!(station, "OUN");
            assert_eq!(time, oun_valid_time());
        }
        other => panic!("expected NoSounding, got {:?}", other),
    }
}

#[test]
fn test_fixture_source() {
    let source = FixtureUpperAir::new();

    assert!(source.request_data(oun_valid_time(), "oun").is_ok());
    assert!(matches!(
        source.request_data(oun_valid_time(), "ABQ"),
        Err(Error::NoSounding { .. })
    ));
    assert_eq!(source.requests.borrow().len(), 2);
}

#[test]
fn test_analysis_of_unstable_sounding() {
    let anal = Analysis::analyze(oun_sounding()).unwrap();
    let sfc = anal.surface_parcel_analysis();

    let lcl = sfc.lcl_pressure().unpack();
    let lfc = sfc.lfc_pressure().unwrap().unpack();
    let el = sfc.el_pressure().unwrap().unpack();

    assert!(lcl > 800.0 && lcl < 900.0, "LCL {}", lcl);
    assert!(lfc > 650.0 && lfc <= lcl, "LFC {}", lfc);
    assert!(el > 150.0 && el < 300.0, "EL {}", el);

    assert!(sfc.cape().unpack() > 300.0);
    assert!(sfc.cin().unpack() <= 0.0);

    let mu = anal.most_unstable_parcel_analysis().unwrap();
    assert!(mu.cape() >= sfc.cape() || approx_equal(mu.cape().unpack(), sfc.cape().unpack(), 1.0));
    assert!(anal.mixed_layer_parcel_analysis().is_some());

    assert_eq!(anal.level_markers().len(), 3);
    assert_eq!(anal.wind_components().len(), 21);
}

#[test]
fn test_parcel_trajectory_reaches_top_of_sounding() {
    let snd = oun_sounding();
    let pcl = surface_parcel(&snd).unwrap();
    let traj = parcel_trajectory(&pcl, &snd).unwrap();

    // The surface, the 20 levels above it, and the LCL.
    assert_eq!(traj.len(), snd.len() + 1);
    assert_eq!(traj[0].0, HectoPascal(965.0));
    assert_eq!(traj.last().unwrap().0, HectoPascal(100.0));

    // The parcel keeps cooling above the coldest level the saturated adiabat can reach.
    assert!(traj.windows(2).all(|w| w[0].1 > w[1].1));
    assert!(traj.last().unwrap().1.unpack() < -80.0);
}

#[test]
fn test_analysis_moisture_and_shear() {
    let anal = Analysis::analyze(oun_sounding()).unwrap();

    let pw = anal.precipitable_water().unwrap().unpack();
    assert!(pw > 20.0 && pw < 45.0, "PW {}", pw);

    let shallow = anal.shear_0_1km().unwrap().unpack();
    let deep = anal.shear_0_6km().unwrap().unpack();
    assert!(shallow > 15.0 && shallow < 40.0, "0-1 km {}", shallow);
    assert!(deep > 40.0 && deep < 70.0, "0-6 km {}", deep);
}

#[test]
fn test_panel_entries() {
    let anal = Analysis::analyze(oun_sounding()).unwrap();
    let entries = anal.panel_entries();

    assert_eq!(entries.len(), 16);
    assert_eq!(entries[0].value, "35.18");
    assert_eq!(entries[1].value, "-97.44");
    assert_eq!(entries[2].value, "357.0 m");
    assert!(entries.iter().all(|entry| !entry.value.is_empty()));
    assert!(entries[3].value.ends_with(" hPa"));
    assert!(entries[9].value.ends_with(" J/kg"));
}
