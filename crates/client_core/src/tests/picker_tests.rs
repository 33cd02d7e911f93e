use super::*;

fn pizza(name: &str, price: i64) -> PizzaSummary {
    PizzaSummary {
        uuid: Uuid::new_v4(),
        name: name.to_string(),
        price,
    }
}

fn view(pizzas: &[PizzaSummary], stored: Option<Uuid>) -> PizzaPageView {
    PizzaPageView {
        pizzas: pizzas.to_vec(),
        pizza_uuid: stored,
        status: 200,
    }
}

#[test]
fn labels_include_price() {
    assert_eq!(
        PizzaPicker::label(&pizza("Margherita", 750)),
        "Margherita (7.50€)"
    );
}

#[test]
fn orders_by_price_and_checks_stored_selection() {
    let funghi = pizza("Funghi", 850);
    let margherita = pizza("Margherita", 750);
    let picker = PizzaPicker::from_view(&view(&[funghi.clone(), margherita.clone()], Some(funghi.uuid)));

    assert_eq!(picker.pizzas()[0].uuid, margherita.uuid);
    assert!(picker.is_checked(funghi.uuid));
    assert!(picker.is_confirmed(funghi.uuid));
    assert!(!picker.is_confirmed(margherita.uuid));
}

#[test]
fn select_moves_radio_but_not_check_mark() {
    let funghi = pizza("Funghi", 850);
    let margherita = pizza("Margherita", 750);
    let mut picker =
        PizzaPicker::from_view(&view(&[funghi.clone(), margherita.clone()], Some(funghi.uuid)));

    picker.select(margherita.uuid).expect("select");
    assert!(picker.is_checked(margherita.uuid));
    assert!(!picker.is_checked(funghi.uuid));
    assert!(picker.is_confirmed(funghi.uuid));

    let values = picker.form_values().expect("values");
    assert_eq!(values["pizzaUUID"], margherita.uuid.to_string());
}

#[test]
fn rejects_pizzas_not_on_the_menu() {
    let mut picker = PizzaPicker::from_view(&view(&[pizza("Funghi", 850)], None));
    let stranger = Uuid::new_v4();
    assert_eq!(picker.select(stranger), Err(PickerError::UnknownPizza(stranger)));
    assert_eq!(picker.form_values(), Err(PickerError::NothingSelected));
}

#[test]
fn apply_view_follows_server_state() {
    let funghi = pizza("Funghi", 850);
    let margherita = pizza("Margherita", 750);
    let pizzas = [funghi.clone(), margherita.clone()];
    let mut picker = PizzaPicker::from_view(&view(&pizzas, None));
    picker.select(margherita.uuid).expect("select");

    picker.apply_view(&view(&pizzas, Some(margherita.uuid)));
    assert!(picker.is_confirmed(margherita.uuid));
    assert!(picker.is_checked(margherita.uuid));

    picker.apply_view(&view(&[funghi.clone()], Some(margherita.uuid)));
    assert_eq!(picker.stored(), None);
    assert_eq!(picker.value(), None);
}
