use std::{cell::RefCell, rc::Rc};
use wkt_map_viewer::{
    Container, DrawTool, InputEvent, MapDrawEvent, MapMode, MapViewer, ViewOptions, ViewerInputs,
};

/// Widget behavior across input changes, mode switches and tool selection
#[cfg(test)]
mod viewer_tests {
    use super::*;
    use approx::assert_relative_eq;
    use wkt_map_viewer::{constants::OSM_URL_TEMPLATE, LatLng};

    const TILES: &str = "https://tiles.example.com/{z}/{x}/{y}.png";

    fn mounted(inputs: ViewerInputs) -> MapViewer {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut viewer = MapViewer::new(inputs).with_fit_options(ViewOptions::immediate());
        assert!(viewer.mount(Container::new("viewer", 800.0, 600.0)));
        viewer
    }

    fn overlay_wkts(viewer: &MapViewer) -> Vec<String> {
        viewer
            .service()
            .current_map()
            .map(|map| map.overlay().source_wkts().into_iter().map(String::from).collect())
            .unwrap_or_default()
    }

    fn interaction_count(viewer: &MapViewer) -> usize {
        viewer
            .service()
            .current_map()
            .map_or(0, |map| map.interactions().len())
    }

    #[test]
    fn test_mount_in_view_mode_renders_and_fits() {
        let viewer = mounted(ViewerInputs::default().with_wkt("POINT(10 20)"));

        assert_eq!(overlay_wkts(&viewer), vec!["POINT(10 20)"]);
        let viewport = viewer.service().current_map().unwrap().viewport();
        assert_eq!(viewport.zoom, 16.0);
        let center = viewport.center_lat_lng();
        assert_relative_eq!(center.lng, 10.0, epsilon = 1e-9);
        assert_relative_eq!(center.lat, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_list_takes_priority_and_single_is_the_fallback() {
        let inputs = ViewerInputs::default()
            .with_wkt("POINT(1 1)")
            .with_wkt_list(["POINT(2 2)", "POINT(3 3)"]);
        let mut viewer = mounted(inputs);
        assert_eq!(overlay_wkts(&viewer), vec!["POINT(2 2)", "POINT(3 3)"]);

        let cleared = viewer.inputs().clone().with_wkt_list(Vec::<String>::new());
        viewer.apply(cleared);
        assert_eq!(overlay_wkts(&viewer), vec!["POINT(1 1)"]);

        let nothing = viewer.inputs().clone().with_wkt("");
        viewer.apply(nothing);
        assert!(overlay_wkts(&viewer).is_empty());
    }

    #[test]
    fn test_bad_geometry_keeps_what_is_shown() {
        let mut viewer = mounted(ViewerInputs::default().with_wkt("POINT(1 1)"));

        let broken = viewer.inputs().clone().with_wkt("POLYGON((0 0, 10 0");
        viewer.apply(broken);
        assert_eq!(overlay_wkts(&viewer), vec!["POINT(1 1)"]);
    }

    #[test]
    fn test_edit_mode_round_trip() {
        let mut viewer = mounted(ViewerInputs::default().with_wkt("POINT(1 1)"));
        let drawn = Rc::new(RefCell::new(Vec::<MapDrawEvent>::new()));
        let sink = Rc::clone(&drawn);
        viewer.on_geometry_drawn(move |event| sink.borrow_mut().push(event.clone()));

        let edit = viewer.inputs().clone().with_mode(MapMode::Edit);
        viewer.apply(edit);

        assert!(overlay_wkts(&viewer).is_empty());
        assert!(viewer.service().is_drawing());
        assert_eq!(viewer.active_tool(), Some(DrawTool::Point));
        assert_eq!(interaction_count(&viewer), 1);

        // entering edit mode recenters on the configured view
        let viewport = viewer.service().current_map().unwrap().viewport();
        assert_eq!(viewport.zoom, 10.0);
        assert_relative_eq!(viewport.center_lat_lng().lat, 41.7151, epsilon = 1e-9);

        assert!(viewer.handle_input(&InputEvent::click(400.0, 300.0)));
        assert_eq!(drawn.borrow().len(), 1);
        let wkt = drawn.borrow()[0].wkt.clone();
        assert!(wkt.starts_with("POINT"));
        assert_eq!(viewer.current_wkt(), wkt);
        assert_eq!(viewer.inputs().wkt, wkt);
        assert_eq!(overlay_wkts(&viewer), vec![wkt.clone()]);

        let view = viewer.inputs().clone().with_mode(MapMode::View);
        viewer.apply(view);
        assert!(!viewer.service().is_drawing());
        assert_eq!(interaction_count(&viewer), 0);
        assert_eq!(overlay_wkts(&viewer), vec![wkt]);
    }

    #[test]
    fn test_drawn_shape_survives_reapplied_host_inputs() {
        let host = ViewerInputs::default().with_mode(MapMode::Edit);
        let mut viewer = mounted(host.clone());

        assert!(viewer.handle_input(&InputEvent::click(400.0, 300.0)));
        let drawn = viewer.current_wkt();
        assert!(drawn.starts_with("POINT"));

        // the host only flips the mode; its wkt is still the empty original
        viewer.apply(host.clone().with_mode(MapMode::View));
        assert!(!viewer.service().is_drawing());
        assert_eq!(viewer.current_wkt(), drawn);
        assert_eq!(overlay_wkts(&viewer), vec![drawn.clone()]);

        viewer.apply(host.clone().with_mode(MapMode::View));
        assert_eq!(overlay_wkts(&viewer), vec![drawn]);

        // a new host geometry replaces the drawn one
        viewer.apply(host.with_mode(MapMode::View).with_wkt("POINT(3 3)"));
        assert_eq!(viewer.current_wkt(), "POINT(3 3)");
        assert_eq!(overlay_wkts(&viewer), vec!["POINT(3 3)"]);
    }

    #[test]
    fn test_edit_options_change_switches_tool() {
        let mut viewer = mounted(ViewerInputs::default().with_mode(MapMode::Edit));
        assert_eq!(viewer.active_tool(), Some(DrawTool::Point));
        assert!(!viewer.show_edit_toolbar());

        let options = viewer
            .inputs()
            .clone()
            .with_edit_options(["CIRCLE", "LINE", "POLYGON"]);
        viewer.apply(options);

        assert_eq!(viewer.edit_tools(), &[DrawTool::Line, DrawTool::Polygon]);
        assert_eq!(viewer.active_tool(), Some(DrawTool::Line));
        assert_eq!(
            viewer.service().drawing_session().active_tool(),
            Some(DrawTool::Line)
        );
        assert!(viewer.show_edit_toolbar());
        assert_eq!(interaction_count(&viewer), 1);
    }

    #[test]
    fn test_unknown_tools_fall_back_to_point() {
        let viewer = mounted(
            ViewerInputs::default()
                .with_mode(MapMode::Edit)
                .with_edit_options(["CIRCLE", "RECTANGLE"]),
        );
        assert_eq!(viewer.edit_tools(), &[DrawTool::Point]);
        assert_eq!(viewer.active_tool(), Some(DrawTool::Point));
        assert!(!viewer.show_edit_toolbar());
    }

    #[test]
    fn test_select_edit_tool() {
        let mut viewer = mounted(
            ViewerInputs::default()
                .with_mode(MapMode::Edit)
                .with_edit_options(["POINT", "POLYGON"]),
        );
        let first_id = viewer.service().current_map().unwrap().interactions()[0].id();

        viewer.select_edit_tool(DrawTool::Point);
        let map = viewer.service().current_map().unwrap();
        assert_eq!(map.interactions()[0].id(), first_id);

        viewer.select_edit_tool(DrawTool::Polygon);
        let map = viewer.service().current_map().unwrap();
        assert_eq!(map.interactions().len(), 1);
        assert_ne!(map.interactions()[0].id(), first_id);
        assert_eq!(map.interactions()[0].tool(), DrawTool::Polygon);
        assert_eq!(map.draw_events().listener_count(), 2);
    }

    #[test]
    fn test_view_and_style_changes_apply_live() {
        let mut viewer = mounted(ViewerInputs::default().with_wkt("POINT(1 1)"));

        let mut inputs = viewer
            .inputs()
            .clone()
            .with_view(LatLng::from_lon_lat(2.35, 48.85), 6.0);
        inputs.point_color = "red".to_string();
        viewer.apply(inputs);

        let map = viewer.service().current_map().unwrap();
        assert_eq!(map.viewport().zoom, 6.0);
        assert_relative_eq!(map.viewport().center_lat_lng().lng, 2.35, epsilon = 1e-9);
        assert_eq!(map.overlay().style().point_color, "red");
        assert_eq!(overlay_wkts(&viewer), vec!["POINT(1 1)"]);
    }

    #[test]
    fn test_base_layer_change_rebuilds_map() {
        let mut viewer = mounted(ViewerInputs::default().with_wkt("POINT(1 1)"));

        let inputs = viewer
            .inputs()
            .clone()
            .with_base_layer_url(Some(TILES.to_string()));
        viewer.apply(inputs);

        let map = viewer.service().current_map().unwrap();
        assert_eq!(map.base_layer().url_template(), TILES);
        assert_eq!(overlay_wkts(&viewer), vec!["POINT(1 1)"]);
    }

    #[test]
    fn test_base_layer_change_keeps_drawing_in_edit_mode() {
        let mut viewer = mounted(ViewerInputs::default().with_mode(MapMode::Edit));

        let inputs = viewer
            .inputs()
            .clone()
            .with_base_layer_url(Some(TILES.to_string()));
        viewer.apply(inputs);
        assert!(viewer.service().is_drawing());
        assert_eq!(interaction_count(&viewer), 1);

        let inputs = viewer.inputs().clone().with_base_layer_url(None);
        viewer.apply(inputs);
        let map = viewer.service().current_map().unwrap();
        assert_eq!(map.base_layer().url_template(), OSM_URL_TEMPLATE);
        assert!(viewer.service().is_drawing());
    }

    #[test]
    fn test_unmount_releases_map() {
        let mut viewer = mounted(ViewerInputs::default().with_mode(MapMode::Edit));
        viewer.unmount();
        assert!(!viewer.is_mounted());
        assert!(!viewer.service().is_drawing());

        // input changes before the next mount only update the cache
        let inputs = viewer.inputs().clone().with_wkt("POINT(3 3)");
        viewer.apply(inputs);
        assert!(viewer.service().current_map().is_none());
        assert!(!viewer.handle_input(&InputEvent::click(1.0, 1.0)));
    }
}
