//! Panel visibility of every admin form toggler, for both checkbox states.

use form_toggle::catalog::togglers;
use form_toggle::{Element, Form, FormKind, Selector, ToggleController, ToggleError, Toggler};

fn element_for(selector: &Selector, element: Element) -> Element {
    match selector {
        Selector::Id(id) => element.with_id(id.clone()),
        Selector::Class(class) => element.with_class(class.clone()),
        Selector::Name(name) => element.with_name(name.clone()),
    }
}

/// Form containing every element the togglers of `kind` refer to.
fn form_for(kind: FormKind, checked: bool) -> Form {
    let mut form = Form::new();
    for toggler in togglers(kind) {
        form.push(element_for(&toggler.control, Element::checkbox(checked)));
        for rule in &toggler.rules {
            form.push(element_for(&rule.target, Element::section()));
        }
    }
    form
}

fn visible(controller: &ToggleController, selector: &str) -> bool {
    let selector: Selector = selector.parse().unwrap();
    controller.form().is_visible(&selector).unwrap()
}

/// `(form, control, [(panel, visible when checked)])` for all eight togglers.
fn truth_table() -> Vec<(FormKind, &'static str, Vec<(&'static str, bool)>)> {
    vec![
        (
            FormKind::Dataset,
            "#id_multi_layer",
            vec![("#panel-enable_all_multi_layers_on_add-section", true)],
        ),
        (
            FormKind::MbtSource,
            "[name=use_default_style]",
            vec![("#panel-open_map_style_json-section", false)],
        ),
        (
            FormKind::RasterFile,
            "#id_auto_ingest_from_directory",
            vec![("#panel-auto_ingest_settings-section", true)],
        ),
        (
            FormKind::RasterFile,
            "#id_auto_ingest_use_custom_directory_name",
            vec![(".show-if-custom-dir-name", true)],
        ),
        (
            FormKind::RasterFile,
            "#id_use_custom_legend",
            vec![("#panel-legend-section", true)],
        ),
        (
            FormKind::RasterStyle,
            "[name=use_custom_colors]",
            vec![
                ("#panel-palette-section", false),
                ("#panel-custom_color_values-section", true),
                ("#panel-steps-section", false),
            ],
        ),
        (
            FormKind::RasterTileLayer,
            "#id_get_time_from_tile_json",
            vec![(".show_if_get_time_checked", true)],
        ),
        (
            FormKind::VectorTileLayer,
            "#id_use_render_layers_json",
            vec![
                ("#panel-render_layers_json-section", true),
                ("#panel-render_layers-section", false),
            ],
        ),
    ]
}

#[test]
fn load_state_matches_truth_table() {
    for checked in [true, false] {
        for (kind, control, panels) in truth_table() {
            let controller = ToggleController::bind(form_for(kind, checked), togglers(kind))
                .unwrap_or_else(|err| panic!("{kind:?}: {err}"));

            for (panel, visible_when_checked) in panels {
                assert_eq!(
                    visible(&controller, panel),
                    checked == visible_when_checked,
                    "{kind:?} {control} checked={checked}: {panel}"
                );
            }
        }
    }
}

#[test]
fn changes_follow_truth_table() {
    for (kind, control, panels) in truth_table() {
        let mut controller = ToggleController::bind(form_for(kind, false), togglers(kind)).unwrap();
        let control: Selector = control.parse().unwrap();

        for checked in [true, false, true] {
            controller.set_checked(&control, checked).unwrap();
            for (panel, visible_when_checked) in &panels {
                assert_eq!(
                    visible(&controller, panel),
                    checked == *visible_when_checked,
                    "{kind:?} {control} checked={checked}: {panel}"
                );
            }
        }
    }
}

#[test]
fn changing_one_control_leaves_other_togglers_alone() {
    let mut controller =
        ToggleController::bind(form_for(FormKind::RasterFile, false), togglers(FormKind::RasterFile))
            .unwrap();

    controller
        .set_checked(&Selector::id("id_use_custom_legend"), true)
        .unwrap();

    assert!(visible(&controller, "#panel-legend-section"));
    assert!(!visible(&controller, "#panel-auto_ingest_settings-section"));
    assert!(!visible(&controller, ".show-if-custom-dir-name"));
}

#[test]
fn class_targets_switch_every_match() {
    let form = form_for(FormKind::RasterTileLayer, true)
        .with(Element::section().with_class("show_if_get_time_checked"))
        .with(Element::section().with_class("show_if_get_time_checked"));
    let mut controller = ToggleController::bind(form, togglers(FormKind::RasterTileLayer)).unwrap();

    let class = Selector::class("show_if_get_time_checked");
    assert_eq!(controller.form().resolve(&class).len(), 3);
    assert_eq!(controller.form().is_visible(&class), Some(true));

    controller
        .set_checked(&Selector::id("id_get_time_from_tile_json"), false)
        .unwrap();
    assert_eq!(controller.form().is_visible(&class), Some(false));
}

#[test]
fn strict_binding_fails_on_renamed_panel() {
    let form = Form::new()
        .with(Element::checkbox(true).with_name("use_default_style"))
        .with(Element::section().with_id("panel-map_style-section"));

    let result = ToggleController::bind(form, togglers(FormKind::MbtSource));
    assert_eq!(
        result.err(),
        Some(ToggleError::MissingElement {
            toggler: "default style".to_string(),
            selector: Selector::id("panel-open_map_style_json-section"),
        })
    );
}

#[test]
fn missing_elements_are_a_silent_noop_for_plain_togglers() {
    let mut form = Form::new().with(Element::section().with_id("panel-legend-section"));
    let before = form.clone();

    for toggler in togglers(FormKind::RasterFile) {
        toggler.apply(&mut form);
    }
    assert_eq!(form, before);
}

#[test]
fn lenient_binding_keeps_complete_togglers() {
    let form = Form::new()
        .with(Element::checkbox(true).with_id("id_use_custom_legend"))
        .with(Element::section().with_id("panel-legend-section"));

    let controller = ToggleController::bind_present(form, togglers(FormKind::RasterFile));
    assert_eq!(controller.bound().collect::<Vec<_>>(), ["custom legend"]);
    assert!(visible(&controller, "#panel-legend-section"));
}

#[test]
fn custom_toggler_follows_same_rules() {
    let toggler = Toggler::new("archive", Selector::id("id_archive"))
        .hide_when_checked(Selector::class("editable"));
    let form = Form::new()
        .with(Element::checkbox(true).with_id("id_archive"))
        .with(Element::section().with_class("editable"));

    let controller = ToggleController::bind(form, vec![toggler]).unwrap();
    assert!(!visible(&controller, ".editable"));
}
