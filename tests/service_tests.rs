use std::{cell::RefCell, rc::Rc};
use wkt_map_viewer::{
    core::projection, Container, DrawTool, InputEvent, LatLng, MapConfig, MapDrawEvent,
    MapService, StyleConfig, ViewOptions, WktFeature,
};

/// Service-level scenarios driven the way a host component drives them
#[cfg(test)]
mod service_tests {
    use super::*;
    use approx::assert_relative_eq;
    use wkt_map_viewer::{
        constants::OSM_URL_TEMPLATE, layers::style::GeometryKind, GeometryInput, KeyCode,
    };

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn mounted_service() -> MapService {
        init_logging();
        let mut service = MapService::new();
        let map = service.initialize(
            Container::new("map-container", 800.0, 600.0),
            MapConfig::default(),
            StyleConfig::default(),
        );
        assert!(map.is_some());
        service
    }

    fn recorder() -> (Rc<RefCell<Vec<MapDrawEvent>>>, impl FnMut(MapDrawEvent) + 'static) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        (events, move |event| sink.borrow_mut().push(event))
    }

    #[test]
    fn test_render_single_point_and_fit() {
        let mut service = mounted_service();
        assert!(service.render_wkt(&WktFeature::new("POINT(44.7872 41.7151)")));

        let expected = projection::from_lon_lat(LatLng::from_lon_lat(44.7872, 41.7151));
        let map = service.current_map().unwrap();
        assert_eq!(map.overlay().len(), 1);
        assert_eq!(map.overlay().features()[0].kind(), GeometryKind::Point);

        let extent = map.overlay().current_extent();
        assert!(!extent.is_empty());
        assert_eq!(extent.area(), 0.0);
        assert_relative_eq!(extent.min.x, expected.x, epsilon = 1e-6);
        assert_relative_eq!(extent.min.y, expected.y, epsilon = 1e-6);

        assert!(service.fit_to_features(&ViewOptions::immediate()));
        let viewport = service.current_map().unwrap().viewport();
        assert_relative_eq!(viewport.center.x, expected.x, epsilon = 1e-6);
        assert_relative_eq!(viewport.center.y, expected.y, epsilon = 1e-6);
        assert_eq!(viewport.zoom, 16.0);
    }

    #[test]
    fn test_render_list_spans_all_points() {
        let mut service = mounted_service();
        let input = GeometryInput::List(vec!["POINT(0 0)".to_string(), "POINT(10 10)".to_string()]);
        assert!(service.render(&input));

        let top_right = projection::from_lon_lat(LatLng::from_lon_lat(10.0, 10.0));
        let extent = service.current_map().unwrap().overlay().current_extent();
        assert_relative_eq!(extent.min.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(extent.min.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(extent.max.x, top_right.x, epsilon = 1e-6);
        assert_relative_eq!(extent.max.y, top_right.y, epsilon = 1e-6);

        assert!(service.fit_to_features(&ViewOptions::immediate()));
        let zoom = service.current_map().unwrap().viewport().zoom;
        assert!(zoom > 0.0 && zoom < 16.0);
    }

    #[test]
    fn test_fit_with_empty_store_leaves_view_alone() {
        let mut service = mounted_service();
        let before = service.current_map().unwrap().viewport().clone();

        assert!(!service.fit_to_features(&ViewOptions::default()));
        assert!(!service.fit_to_features(&ViewOptions::immediate()));

        let after = service.current_map().unwrap().viewport();
        assert_eq!(after.center, before.center);
        assert_eq!(after.zoom, before.zoom);
        assert!(!after.is_animating());
    }

    #[test]
    fn test_completed_polygon_is_reported_once() {
        let mut service = mounted_service();
        let (events, on_complete) = recorder();
        assert!(service.enable_drawing(DrawTool::Polygon, on_complete));

        for (x, y) in [(300.0, 200.0), (500.0, 200.0), (500.0, 400.0)] {
            assert!(service.handle_input(&InputEvent::click(x, y)));
        }
        // clicking the first vertex again closes the ring
        service.handle_input(&InputEvent::click(302.0, 201.0));

        let events = events.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].tool, DrawTool::Polygon);
        assert!(events[0].wkt.starts_with("POLYGON"));

        let overlay = service.current_map().unwrap().overlay();
        assert_eq!(overlay.len(), 1);
        assert_eq!(overlay.features()[0].kind(), GeometryKind::Polygon);
        assert_eq!(overlay.source_wkts(), vec![events[0].wkt.as_str()]);
    }

    #[test]
    fn test_enabling_repeatedly_keeps_one_session() {
        let mut service = mounted_service();
        let counters: Vec<Rc<RefCell<usize>>> = (0..5).map(|_| Rc::new(RefCell::new(0))).collect();
        for counter in &counters {
            let counter = Rc::clone(counter);
            assert!(service.enable_drawing(DrawTool::Point, move |_| *counter.borrow_mut() += 1));
        }

        let map = service.current_map().unwrap();
        assert_eq!(map.interactions().len(), 1);
        assert_eq!(map.draw_events().listener_count(), 2);

        service.handle_input(&InputEvent::click(400.0, 300.0));
        let fired: Vec<usize> = counters.iter().map(|c| *c.borrow()).collect();
        assert_eq!(fired, vec![0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_disable_drawing_releases_everything() {
        let mut service = mounted_service();
        let (events, on_complete) = recorder();
        service.enable_drawing(DrawTool::Line, on_complete);
        assert!(service.is_drawing());

        assert!(service.disable_drawing());
        assert!(!service.disable_drawing());

        let map = service.current_map().unwrap();
        assert!(map.interactions().is_empty());
        assert_eq!(map.draw_events().listener_count(), 0);

        assert!(!service.handle_input(&InputEvent::click(10.0, 10.0)));
        assert!(!service.handle_input(&InputEvent::key(KeyCode::Enter)));
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_reconfigure_base_layer_restores_features() {
        let mut service = mounted_service();
        assert!(service.render(&GeometryInput::List(vec![
            "POINT(1 1)".to_string(),
            "LINESTRING(0 0, 5 5)".to_string(),
        ])));

        let template = "https://tiles.example.com/{z}/{x}/{y}.png";
        assert!(service.reconfigure_base_layer(Some(template.to_string())));

        let map = service.current_map().unwrap();
        assert_eq!(map.base_layer().url_template(), template);
        assert_eq!(map.config().base_layer_url_tpl.as_deref(), Some(template));
        assert_eq!(
            map.overlay().source_wkts(),
            vec!["POINT(1 1)", "LINESTRING(0 0, 5 5)"]
        );

        assert!(service.reconfigure_base_layer(None));
        let map = service.current_map().unwrap();
        assert_eq!(map.base_layer().url_template(), OSM_URL_TEMPLATE);
        assert_eq!(map.overlay().len(), 2);
    }

    #[test]
    fn test_malformed_render_keeps_previous_features() {
        let mut service = mounted_service();
        assert!(service.render_wkt(&WktFeature::new("POINT(5 5)")));

        assert!(!service.render_wkt(&WktFeature::new("POLYGON((0 0, 10 0")));
        assert!(!service.render(&GeometryInput::Single("   ".to_string())));

        let overlay = service.current_map().unwrap().overlay();
        assert_eq!(overlay.source_wkts(), vec!["POINT(5 5)"]);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut service = mounted_service();
        service.render_wkt(&WktFeature::new("POINT(5 5)"));

        assert!(service.clear_features());
        assert!(service.current_map().unwrap().overlay().is_empty());
        assert!(service.clear_features());
        assert!(service.current_map().unwrap().overlay().is_empty());
    }

    #[test]
    fn test_attribution_updates_live() {
        let mut service = mounted_service();
        service.render_wkt(&WktFeature::new("POINT(5 5)"));

        let config = MapConfig::default().with_attribution(false, true, true);
        assert!(service.update_attribution(&config));

        let map = service.current_map().unwrap();
        assert!(!map.attribution().is_visible());
        assert!(map.attribution().is_collapsed());
        assert_eq!(map.attribution().text(), "");
        // no rebuild: the features are still there
        assert_eq!(map.overlay().len(), 1);
    }

    #[test]
    fn test_update_map_view_cancels_animation() -> anyhow::Result<()> {
        let mut service = mounted_service();
        service.render_wkt(&WktFeature::new("POINT(5 5)"));
        assert!(service.fit_to_features(&ViewOptions::default()));
        assert!(service.current_map().unwrap().viewport().is_animating());

        let center = LatLng::from_lon_lat(2.35, 48.85);
        assert!(service.update_map_view(center, 7.0));

        let viewport = service.current_map().unwrap().viewport();
        assert!(!viewport.is_animating());
        assert_eq!(viewport.zoom, 7.0);
        let actual = viewport.center_lat_lng();
        assert_relative_eq!(actual.lat, 48.85, epsilon = 1e-9);
        assert_relative_eq!(actual.lng, 2.35, epsilon = 1e-9);

        let config: MapConfig = MapConfig::from_json(r#"{"attribution": false}"#)?;
        assert!(service.update_attribution(&config));
        Ok(())
    }

    #[test]
    fn test_destroy_then_commands_fail() {
        let mut service = mounted_service();
        service.enable_drawing(DrawTool::Point, |_| {});
        service.destroy();

        assert!(!service.is_initialized());
        assert!(!service.is_drawing());
        assert!(!service.render_wkt(&WktFeature::new("POINT(1 1)")));
        assert!(!service.reconfigure_base_layer(None));
        assert!(service.reinitialize(MapConfig::default(), StyleConfig::default()).is_some());
        assert!(service.current_map().unwrap().overlay().is_empty());
    }
}
